use crate::util::parse_rsa;
use base64::prelude::*;
use derive_more::{Deref, Display, From};
use openssl::pkey::Public;
use openssl::rsa::Rsa;
use serde::{Deserialize, Serialize};
use std::cmp::Eq;
use std::fmt::Debug;
use std::hash::Hash;

/// Unique identifier for an Operator, assigned by the operator registry.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    From,
    Deref,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct OperatorId(pub u64);

/// An independent node operator that can hold one encrypted piece of a validator key.
#[derive(Debug, Clone)]
pub struct Operator {
    /// ID to uniquely identify this operator
    pub id: OperatorId,
    /// RSA public key that key shares addressed to this operator are encrypted with
    pub rsa_pubkey: Rsa<Public>,
    /// Base-64 encoded PEM public key, exactly as published by the registry
    pub encoded_pubkey: String,
}

impl Operator {
    /// Creates a new operator from its OperatorId and base64 encoded PEM public key string
    pub fn new(pem_data: &str, operator_id: OperatorId) -> Result<Self, String> {
        let rsa_pubkey = parse_rsa(pem_data)?;
        Ok(Self {
            id: operator_id,
            rsa_pubkey,
            encoded_pubkey: pem_data.to_string(),
        })
    }

    // Creates a new operator from an existing RSA public key and OperatorId
    pub fn new_with_pubkey(rsa_pubkey: Rsa<Public>, id: OperatorId) -> Result<Self, String> {
        let pem = rsa_pubkey
            .public_key_to_pem()
            .map_err(|e| format!("Unable to encode RSA public key: {}", e))?;
        Ok(Self {
            id,
            rsa_pubkey,
            encoded_pubkey: BASE64_STANDARD.encode(pem),
        })
    }
}

#[cfg(test)]
mod operator_tests {
    use super::*;

    #[test]
    fn operator_from_pubkey_and_id() {
        // Random valid operator public key and id: https://explorer.ssv.network/operators/1141
        let pem_data = "LS0tLS1CRUdJTiBSU0EgUFVCTElDIEtFWS0tLS0tCk1JSUJJakFOQmdrcWhraUc5dzBCQVFFRkFBT0NBUThBTUlJQkNnS0NBUUVBbFFmQVIzMEd4bFpacEwrNDByU0IKTEpSYlkwY2laZDBVMXhtTlp1bFB0NzZKQXJ5d2lia0Y4SFlQV2xkM3dERVdWZXZjRzRGVVBSZ0hDM1MrTHNuMwpVVC9TS280eE9nNFlnZ0xqbVVXQysyU3ZGRFhXYVFvdFRXYW5UU0drSEllNGFnTVNEYlUzOWhSMWdOSTJhY2NNCkVCcjU2eXpWcFMvKytkSk5xU002S1FQM3RnTU5ia2IvbEtlY0piTXM0ZWNRMTNkWUQwY3dFNFQxcEdTYUdhcEkKbFNaZ2lYd0cwSGFNTm5GUkt0OFlkZjNHaTFMRlh3Zlo5NHZFRjJMLzg3RCtidjdkSFVpSGRjRnh0Vm0rVjVvawo3VFptcnpVdXB2NWhKZ3lDVE9zc0xHOW1QSGNORnhEVDJ4NUJKZ2FFOVpJYnMrWVZ5a1k3UTE4VEhRS2lWcDFaCmp3SURBUUFCCi0tLS0tRU5EIFJTQSBQVUJMSUMgS0VZLS0tLS0K";
        let operator_id = 1141;

        let operator = Operator::new(pem_data, operator_id.into());
        assert!(operator.is_ok());

        if let Ok(op) = operator {
            assert_eq!(op.id.0, operator_id);
            assert_eq!(op.encoded_pubkey, pem_data);
            assert_eq!(op.rsa_pubkey.size(), 256);
        }
    }

    #[test]
    fn operator_rejects_garbage_key() {
        assert!(Operator::new("not base64 at all!", OperatorId(1)).is_err());
        let not_pem = BASE64_STANDARD.encode("hello");
        assert!(Operator::new(&not_pem, OperatorId(1)).is_err());
    }

    #[test]
    fn operator_with_pubkey_roundtrips_encoding() {
        let rsa = Rsa::generate(2048).expect("Failed to generate RSA key");
        let public = Rsa::public_key_from_pem(&rsa.public_key_to_pem().unwrap()).unwrap();
        let operator = Operator::new_with_pubkey(public, OperatorId(7)).unwrap();

        // The transport encoding must parse back into the same key
        let reparsed = Operator::new(&operator.encoded_pubkey, OperatorId(7)).unwrap();
        assert_eq!(
            reparsed.rsa_pubkey.n().to_vec(),
            operator.rsa_pubkey.n().to_vec()
        );
    }
}
