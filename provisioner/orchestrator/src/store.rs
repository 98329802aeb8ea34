use crate::error::StoreError;
use serde::Deserialize;
use ssv_types::DepositData;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything stored for one pending validator
#[derive(Debug, Clone)]
pub struct KeystoreEntry {
    /// EIP-2335 keystore JSON
    pub keystore_json: String,
    pub deposit: DepositData,
}

/// Source of prepared keystores and deposit data, keyed by a 1 based validator index.
pub trait KeystoreStore {
    fn load(&self, index: usize) -> Result<KeystoreEntry, StoreError>;

    /// The number of prepared keystores with an index of at least `first_index`
    fn count_from(&self, first_index: usize) -> Result<usize, StoreError>;
}

// The staking deposit CLI writes a list with one element per validator
#[derive(Deserialize)]
#[serde(untagged)]
enum DepositFile {
    Single(DepositData),
    List(Vec<DepositData>),
}

/// A store reading `keystore{i}.json` and `deposit{i}.json` from two directories.
#[derive(Debug, Clone)]
pub struct FileKeystoreStore {
    keystore_dir: PathBuf,
    deposit_dir: PathBuf,
}

impl FileKeystoreStore {
    pub fn new(keystore_dir: impl Into<PathBuf>, deposit_dir: impl Into<PathBuf>) -> Self {
        Self {
            keystore_dir: keystore_dir.into(),
            deposit_dir: deposit_dir.into(),
        }
    }

    pub fn keystore_path(&self, index: usize) -> PathBuf {
        self.keystore_dir.join(format!("keystore{index}.json"))
    }

    pub fn deposit_path(&self, index: usize) -> PathBuf {
        self.deposit_dir.join(format!("deposit{index}.json"))
    }

    /// Indices of every `keystore{i}.json` in the keystore directory, ascending
    pub fn indices(&self) -> Result<Vec<usize>, StoreError> {
        let entries = fs::read_dir(&self.keystore_dir)
            .map_err(|e| StoreError::Io(format!("{}: {e}", self.keystore_dir.display())))?;

        let mut indices = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Io(e.to_string()))?;
            let name = entry.file_name();
            let index = name
                .to_str()
                .and_then(|name| name.strip_prefix("keystore"))
                .and_then(|rest| rest.strip_suffix(".json"))
                .and_then(|index| index.parse::<usize>().ok());
            indices.extend(index);
        }
        indices.sort_unstable();
        Ok(indices)
    }
}

fn read(path: &Path) -> Result<String, StoreError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => StoreError::NotFound(path.display().to_string()),
        _ => StoreError::Io(format!("{}: {e}", path.display())),
    })
}

impl KeystoreStore for FileKeystoreStore {
    fn load(&self, index: usize) -> Result<KeystoreEntry, StoreError> {
        let keystore_json = read(&self.keystore_path(index))?;

        let deposit_path = self.deposit_path(index);
        let deposit = match serde_json::from_str(&read(&deposit_path)?) {
            Ok(DepositFile::Single(deposit)) => deposit,
            Ok(DepositFile::List(mut list)) if list.len() == 1 => list.remove(0),
            Ok(DepositFile::List(list)) => {
                return Err(StoreError::Malformed(format!(
                    "{}: expected one deposit, found {}",
                    deposit_path.display(),
                    list.len()
                )))
            }
            Err(e) => {
                return Err(StoreError::Malformed(format!(
                    "{}: {e}",
                    deposit_path.display()
                )))
            }
        };

        debug!(index, "Loaded keystore entry");
        Ok(KeystoreEntry {
            keystore_json,
            deposit,
        })
    }

    fn count_from(&self, first_index: usize) -> Result<usize, StoreError> {
        Ok(self
            .indices()?
            .into_iter()
            .filter(|index| *index >= first_index)
            .count())
    }
}

#[cfg(test)]
mod store_tests {
    use super::*;
    use tempfile::TempDir;

    const DEPOSIT: &str = r#"{"pubkey":"aa","withdrawal_credentials":"bb","amount":32000000000,"signature":"cc","deposit_data_root":"dd"}"#;

    fn store() -> (TempDir, FileKeystoreStore) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("keystores")).unwrap();
        fs::create_dir(dir.path().join("deposits")).unwrap();
        let store = FileKeystoreStore::new(dir.path().join("keystores"), dir.path().join("deposits"));
        (dir, store)
    }

    #[test]
    fn test_load_single_and_list_deposits() {
        let (_dir, store) = store();
        fs::write(store.keystore_path(1), "{}").unwrap();
        fs::write(store.deposit_path(1), DEPOSIT).unwrap();
        fs::write(store.keystore_path(2), "{}").unwrap();
        fs::write(store.deposit_path(2), format!("[{DEPOSIT}]")).unwrap();

        let first = store.load(1).unwrap();
        let second = store.load(2).unwrap();
        assert_eq!(first.deposit, second.deposit);
        assert_eq!(first.deposit.pubkey, "aa");
        assert_eq!(first.keystore_json, "{}");
        assert_eq!(store.count_from(1).unwrap(), 2);
    }

    #[test]
    fn test_missing_entries() {
        let (_dir, store) = store();
        assert!(matches!(store.load(1), Err(StoreError::NotFound(_))));

        fs::write(store.keystore_path(1), "{}").unwrap();
        assert!(matches!(store.load(1), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_malformed_deposits() {
        let (_dir, store) = store();
        fs::write(store.keystore_path(1), "{}").unwrap();
        fs::write(store.deposit_path(1), format!("[{DEPOSIT},{DEPOSIT}]")).unwrap();
        assert!(matches!(store.load(1), Err(StoreError::Malformed(_))));

        fs::write(store.deposit_path(1), "{\"pubkey\": 1}").unwrap();
        assert!(matches!(store.load(1), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn test_count_ignores_other_files() {
        let (dir, store) = store();
        fs::write(store.keystore_path(1), "{}").unwrap();
        fs::write(store.keystore_path(7), "{}").unwrap();
        fs::write(dir.path().join("keystores").join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("keystores").join("keystore-backup.json"), "").unwrap();
        assert_eq!(store.indices().unwrap(), vec![1, 7]);
        assert_eq!(store.count_from(1).unwrap(), 2);
    }

    #[test]
    fn test_count_from_first_index() {
        let (_dir, store) = store();
        for index in 1..=10 {
            fs::write(store.keystore_path(index), "{}").unwrap();
        }
        assert_eq!(store.count_from(1).unwrap(), 10);
        assert_eq!(store.count_from(5).unwrap(), 6);
        assert_eq!(store.count_from(11).unwrap(), 0);
    }
}
