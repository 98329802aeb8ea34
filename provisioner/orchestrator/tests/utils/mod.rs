#![allow(dead_code)]

use base64::prelude::*;
use bls::Keypair;
use eth2_keystore::json_keystore::{Kdf, Pbkdf2, Prf};
use eth2_keystore::{KeystoreBuilder, DKLEN};
use openssl::rsa::Rsa;
use operator_directory::{DirectoryError, OperatorRegistry};
use orchestrator::{
    ChainDepositGateway, ChainRegistrationGateway, GatewayError, KeystoreEntry, KeystoreStore,
    StoreError,
};
use parking_lot::Mutex;
use ssv_types::{DepositData, Operator, OperatorId, RegistrationPayload};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub const PASSWORD: &str = "provisioning-password";

/// Registry returning a fixed operator list, or failing
pub struct MockRegistry {
    operators: Option<Vec<Operator>>,
}

impl MockRegistry {
    pub fn with_operators(count: u64) -> Self {
        Self {
            operators: Some(generators::operators(1..=count)),
        }
    }

    pub fn unavailable() -> Self {
        Self { operators: None }
    }
}

impl OperatorRegistry for MockRegistry {
    async fn fetch_operators(&self) -> Result<Vec<Operator>, DirectoryError> {
        self.operators
            .clone()
            .ok_or_else(|| DirectoryError::Unavailable("registry is down".to_string()))
    }
}

/// In memory keystore store
#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<usize, KeystoreEntry>,
}

impl MemoryStore {
    pub fn insert(&mut self, index: usize, entry: KeystoreEntry) {
        self.entries.insert(index, entry);
    }

    pub fn entry(&self, index: usize) -> &KeystoreEntry {
        &self.entries[&index]
    }

    pub fn entry_mut(&mut self, index: usize) -> &mut KeystoreEntry {
        self.entries.get_mut(&index).unwrap()
    }
}

impl KeystoreStore for MemoryStore {
    fn load(&self, index: usize) -> Result<KeystoreEntry, StoreError> {
        self.entries
            .get(&index)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("keystore {index}")))
    }

    fn count_from(&self, first_index: usize) -> Result<usize, StoreError> {
        Ok(self.entries.keys().filter(|index| **index >= first_index).count())
    }
}

/// Gateway recording every submission. Registration rejects a public key it has seen before,
/// like the on-chain registry does.
#[derive(Clone, Default)]
pub struct RecordingGateway {
    pub deposits: Arc<Mutex<Vec<DepositData>>>,
    pub registrations: Arc<Mutex<Vec<RegistrationPayload>>>,
    failing_deposits: Arc<Mutex<HashSet<String>>>,
    rejecting_registrations: Arc<Mutex<bool>>,
}

impl RecordingGateway {
    /// Fail the deposit of the given 0x prefixed public key
    pub fn fail_deposit_of(&self, pubkey: &str) {
        self.failing_deposits.lock().insert(pubkey.to_string());
    }

    /// Revert every registration until called again with `false`
    pub fn reject_registrations(&self, reject: bool) {
        *self.rejecting_registrations.lock() = reject;
    }

    pub fn deposit_count(&self) -> usize {
        self.deposits.lock().len()
    }

    pub fn registration_count(&self) -> usize {
        self.registrations.lock().len()
    }
}

impl ChainDepositGateway for RecordingGateway {
    async fn deposit(&self, deposit: &DepositData) -> Result<(), GatewayError> {
        if self.failing_deposits.lock().contains(&deposit.pubkey) {
            return Err(GatewayError::Reverted("insufficient pool balance".to_string()));
        }
        self.deposits.lock().push(deposit.clone());
        Ok(())
    }
}

impl ChainRegistrationGateway for RecordingGateway {
    async fn register(&self, registration: &RegistrationPayload) -> Result<(), GatewayError> {
        if *self.rejecting_registrations.lock() {
            return Err(GatewayError::Transport("nonce too low".to_string()));
        }
        let mut registrations = self.registrations.lock();
        if registrations
            .iter()
            .any(|existing| existing.pub_key == registration.pub_key)
        {
            return Err(GatewayError::Reverted("ValidatorAlreadyExists".to_string()));
        }
        registrations.push(registration.clone());
        Ok(())
    }
}

pub mod generators {
    use super::*;

    pub fn operators(ids: impl IntoIterator<Item = u64>) -> Vec<Operator> {
        // One key is shared by all operators, shares are not decrypted in these tests
        let rsa = Rsa::generate(1024).expect("Failed to generate RSA key");
        let pem = BASE64_STANDARD.encode(rsa.public_key_to_pem().unwrap());
        ids.into_iter()
            .map(|id| Operator::new(&pem, OperatorId(id)).unwrap())
            .collect()
    }

    pub fn keystore_json(keypair: &Keypair, password: &str) -> String {
        let kdf = Kdf::Pbkdf2(Pbkdf2 {
            dklen: DKLEN,
            c: 1000,
            prf: Prf::HmacSha256,
            salt: vec![3; 32].into(),
        });
        KeystoreBuilder::new(keypair, password.as_bytes(), "".into())
            .unwrap()
            .kdf(kdf)
            .build()
            .unwrap()
            .to_json_string()
            .unwrap()
    }

    // Deposit data as written by the deposit CLI, without 0x prefixes
    pub fn deposit(keypair: &Keypair) -> DepositData {
        DepositData {
            pubkey: hex::encode(keypair.pk.serialize()),
            withdrawal_credentials: format!("01{}", "00".repeat(31)),
            signature: "aa".repeat(96),
            deposit_data_root: "bb".repeat(32),
        }
    }

    pub fn entry(keypair: &Keypair, password: &str) -> KeystoreEntry {
        KeystoreEntry {
            keystore_json: keystore_json(keypair, password),
            deposit: deposit(keypair),
        }
    }

    /// A store with validators at `indices`, and their keypairs in the same order
    pub fn store(indices: impl IntoIterator<Item = usize>) -> (MemoryStore, Vec<Keypair>) {
        let mut store = MemoryStore::default();
        let mut keypairs = Vec::new();
        for index in indices {
            let keypair = Keypair::random();
            store.insert(index, entry(&keypair, PASSWORD));
            keypairs.push(keypair);
        }
        (store, keypairs)
    }

    pub fn pubkey_hex(keypair: &Keypair) -> String {
        format!("0x{}", hex::encode(keypair.pk.serialize()))
    }
}
