use crate::cli::ProvisionerCli;
use alloy::primitives::utils::parse_ether;
use alloy::primitives::{Address, U256};
use operator_directory::CommitteeSelection;
use sensitive_url::SensitiveUrl;
use std::path::PathBuf;
use std::str::FromStr;
use zeroize::Zeroizing;

/// Everything a provisioning run needs, validated
#[derive(Clone, Debug)]
pub struct Config {
    pub directory: operator_directory::Config,
    pub provisioning: orchestrator::Config,
    pub keystore_dir: PathBuf,
    pub deposit_dir: PathBuf,
    /// Validators to provision. `None` runs the pool balance precheck.
    pub count: Option<usize>,
    pub execution_url: SensitiveUrl,
    pub pool_address: Address,
    pub ssv_fee: U256,
    pub report: Option<PathBuf>,
    pub previous_report: Option<PathBuf>,
    pub metrics_file: Option<PathBuf>,
    pub debug_level: String,
}

/// Secrets are kept out of [`Config`] so it can be logged
pub struct Secrets {
    pub keystore_password: Zeroizing<String>,
    pub signer_private_key: Zeroizing<String>,
}

impl Config {
    pub fn from_cli(cli: &ProvisionerCli) -> Result<Self, String> {
        let directory = operator_directory::Config {
            url: cli.operators_url.trim_end_matches('/').to_string(),
            page: cli.operators_page,
            per_page: cli.operators_per_page,
            ..Default::default()
        };

        let selection = if cli.round_robin {
            CommitteeSelection::RoundRobin
        } else {
            CommitteeSelection::Fixed(cli.committee_index)
        };
        if cli.first_index == 0 {
            return Err("--first-index starts at 1".to_string());
        }
        let provisioning = orchestrator::Config {
            committee_size: cli.committee_size,
            selection,
            first_index: cli.first_index,
        };

        let execution_url = SensitiveUrl::parse(&cli.execution_url)
            .map_err(|e| format!("Invalid execution url: {e:?}"))?;
        let pool_address = Address::from_str(&cli.pool_address)
            .map_err(|e| format!("Invalid pool address {}: {e}", cli.pool_address))?;
        let ssv_fee =
            parse_ether(&cli.ssv_fee).map_err(|e| format!("Invalid ssv fee {}: {e}", cli.ssv_fee))?;

        Ok(Self {
            directory,
            provisioning,
            keystore_dir: cli.keystore_dir.clone(),
            deposit_dir: cli.deposit_dir.clone(),
            count: cli.count,
            execution_url,
            pool_address,
            ssv_fee,
            report: cli.report.clone(),
            previous_report: cli.previous_report.clone(),
            metrics_file: cli.metrics_file.clone(),
            debug_level: cli.debug_level.clone(),
        })
    }
}

impl Secrets {
    /// Moves the secrets out of the parsed arguments, leaving empty strings behind
    pub fn take_from_cli(cli: &mut ProvisionerCli) -> Self {
        Self {
            keystore_password: Zeroizing::new(std::mem::take(&mut cli.keystore_password)),
            signer_private_key: Zeroizing::new(std::mem::take(&mut cli.signer_private_key)),
        }
    }
}
