use crate::error::DirectoryError;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use ssv_types::{Operator, OperatorId};
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Default operator API of the SSV network
pub const DEFAULT_REGISTRY_URL: &str = "https://api.ssv.network/api/v4/mainnet";

/// Default amount of operators requested in a single page
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Timeout for a single registry request
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A source of operator records.
///
/// Implementations must return operators ordered by ascending id, and must not retry
/// internally: whether a failed fetch aborts the run is decided by the caller.
pub trait OperatorRegistry {
    fn fetch_operators(
        &self,
    ) -> impl Future<Output = Result<Vec<Operator>, DirectoryError>> + Send;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Configuration for an [`HttpOperatorRegistry`]
pub struct Config {
    /// Base url of the operator API. `/operators` is appended to it.
    pub url: String,
    /// The page of operators to request
    pub page: u32,
    /// The amount of operators to request
    pub per_page: u32,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_REGISTRY_URL.to_string(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// Response of `GET operators`
#[derive(Debug, Deserialize)]
struct OperatorsResponse {
    operators: Vec<OperatorRecord>,
}

// The fields of a single operator the directory cares about
#[derive(Debug, Deserialize)]
struct OperatorRecord {
    id: u64,
    public_key: String,
}

/// Operator registry backed by the SSV operator HTTP API
#[derive(Debug, Clone)]
pub struct HttpOperatorRegistry {
    client: Client,
    operators_url: Url,
    page: u32,
    per_page: u32,
}

impl HttpOperatorRegistry {
    pub fn new(config: &Config) -> Result<Self, DirectoryError> {
        let base = config.url.trim_end_matches('/');
        let operators_url = Url::parse(&format!("{base}/operators")).map_err(|e| {
            DirectoryError::InvalidConfig(format!("Invalid operator registry url: {e}"))
        })?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DirectoryError::InvalidConfig(format!("Unable to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            operators_url,
            page: config.page,
            per_page: config.per_page,
        })
    }
}

impl OperatorRegistry for HttpOperatorRegistry {
    #[instrument(skip(self), fields(url = %self.operators_url))]
    async fn fetch_operators(&self) -> Result<Vec<Operator>, DirectoryError> {
        let response = self
            .client
            .get(self.operators_url.clone())
            .query(&[
                ("page", self.page.to_string()),
                ("perPage", self.per_page.to_string()),
                ("ordering", "id:asc".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                DirectoryError::Unavailable(format!("Operator registry request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Unavailable(format!(
                "Operator registry responded with status {status}"
            )));
        }

        let payload: OperatorsResponse = response.json().await.map_err(|e| {
            DirectoryError::Unavailable(format!("Malformed operator registry payload: {e}"))
        })?;

        let operators = into_operators(payload.operators);
        info!(operator_count = operators.len(), "Fetched operators");
        Ok(operators)
    }
}

// Turn registry records into operators in ascending id order. Records with a duplicated id keep
// their first occurrence, records with an unusable public key are skipped.
fn into_operators(records: Vec<OperatorRecord>) -> Vec<Operator> {
    let mut operators = BTreeMap::new();
    for record in records {
        let id = OperatorId(record.id);
        if operators.contains_key(&id) {
            warn!(operator_id = %id, "Duplicate operator record, ignoring");
            continue;
        }
        match Operator::new(&record.public_key, id) {
            Ok(operator) => {
                operators.insert(id, operator);
            }
            Err(e) => {
                warn!(operator_id = %id, error = %e, "Skipping operator with invalid public key");
            }
        }
    }
    debug!(operator_count = operators.len(), "Parsed operator records");
    operators.into_values().collect()
}

#[cfg(test)]
mod registry_tests {
    use super::*;
    use base64::prelude::*;
    use openssl::rsa::Rsa;

    fn encoded_key() -> String {
        let rsa = Rsa::generate(1024).expect("Failed to generate RSA key");
        BASE64_STANDARD.encode(rsa.public_key_to_pem().unwrap())
    }

    #[test]
    fn test_records_sorted_and_deduplicated() {
        let key = encoded_key();
        let records = [5, 2, 9, 2, 1]
            .into_iter()
            .map(|id| OperatorRecord {
                id,
                public_key: key.clone(),
            })
            .collect();

        let ids: Vec<u64> = into_operators(records).iter().map(|op| *op.id).collect();
        assert_eq!(ids, vec![1, 2, 5, 9]);
    }

    #[test]
    fn test_invalid_key_is_skipped() {
        let records = vec![
            OperatorRecord {
                id: 1,
                public_key: encoded_key(),
            },
            OperatorRecord {
                id: 2,
                public_key: "garbage".to_string(),
            },
        ];
        let operators = into_operators(records);
        assert_eq!(operators.len(), 1);
        assert_eq!(operators[0].id, OperatorId(1));
    }

    #[test]
    fn test_invalid_url() {
        let config = Config {
            url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            HttpOperatorRegistry::new(&config),
            Err(DirectoryError::InvalidConfig(_))
        ));
    }
}
