use crate::{Committee, OperatorId};
use base64::prelude::*;
use bls::PublicKey;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One of N shares of a split validator key.
#[derive(Debug, Clone)]
pub struct Share {
    /// The operator this share is addressed to
    pub operator_id: OperatorId,
    /// Base-64 encoded PEM key of the operator, as published by the registry
    pub operator_pubkey: String,
    /// The public key of this Share
    pub share_pubkey: PublicKey,
    /// The share private key, encrypted to the operator's RSA key
    pub encrypted_private_key: Vec<u8>,
}

/// All shares of one validator key, split against one committee.
#[derive(Debug, Clone)]
pub struct KeyShareSet {
    validator_pubkey: PublicKey,
    shares: Vec<Share>,
    threshold: usize,
}

impl KeyShareSet {
    /// Assemble a share set. The shares must match the committee one to one and in order.
    pub fn new(
        validator_pubkey: PublicKey,
        shares: Vec<Share>,
        threshold: usize,
        committee: &Committee,
    ) -> Result<Self, String> {
        if shares.len() != committee.len() {
            return Err(format!(
                "Expected {} shares for the committee, got {}",
                committee.len(),
                shares.len()
            ));
        }
        if threshold == 0 || threshold > shares.len() {
            return Err(format!(
                "Threshold {} is invalid for {} shares",
                threshold,
                shares.len()
            ));
        }

        let mut seen = HashSet::new();
        for (share, member) in shares.iter().zip(committee.members()) {
            if share.operator_id != member.id {
                return Err(format!(
                    "Share for operator {} is out of committee order, expected operator {}",
                    share.operator_id, member.id
                ));
            }
            if !seen.insert(share.operator_id) {
                return Err(format!("Duplicate share for operator {}", share.operator_id));
            }
        }

        Ok(Self {
            validator_pubkey,
            shares,
            threshold,
        })
    }

    pub fn validator_pubkey(&self) -> &PublicKey {
        &self.validator_pubkey
    }

    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    /// The number of shares needed to reconstruct the validator key
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn operator_ids(&self) -> Vec<OperatorId> {
        self.shares.iter().map(|share| share.operator_id).collect()
    }

    /// Build the transport form of this share set that is submitted for on-chain registration
    pub fn to_registration(&self) -> RegistrationPayload {
        RegistrationPayload {
            pub_key: format!("0x{}", hex::encode(self.validator_pubkey.serialize())),
            public_shares: self
                .shares
                .iter()
                .map(|share| BASE64_STANDARD.encode(share.share_pubkey.serialize()))
                .collect(),
            encrypted_shares: self
                .shares
                .iter()
                .map(|share| BASE64_STANDARD.encode(&share.encrypted_private_key))
                .collect(),
            operator_ids: self.operator_ids().into_iter().map(|id| *id).collect(),
            operator_public_keys: self
                .shares
                .iter()
                .map(|share| share.operator_pubkey.clone())
                .collect(),
            threshold: self.threshold,
        }
    }
}

/// Registration data for a validator, in committee order. Every binary component is base64
/// encoded so it can be embedded as an opaque string in a transaction payload or a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    /// 0x prefixed hex public key of the validator
    pub pub_key: String,
    pub public_shares: Vec<String>,
    pub encrypted_shares: Vec<String>,
    pub operator_ids: Vec<u64>,
    pub operator_public_keys: Vec<String>,
    /// Shares needed to reconstruct the validator key
    pub threshold: usize,
}
