use crate::util::prefix_hex;
use serde::{Deserialize, Serialize};

// phase0.PublicKeyLength
const PUBLIC_KEY_LENGTH: usize = 48;
// phase0.SignatureLength
const SIGNATURE_LENGTH: usize = 96;
// Withdrawal credentials and the deposit data root are both 32 byte roots
const ROOT_LENGTH: usize = 32;

/// The deposit data required by the deposit contract to activate a validator.
///
/// Fields are hex strings. At rest they carry no `0x` prefix, [`DepositData::prefixed`] adds it
/// before submission. Any extra fields written by the deposit CLI are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositData {
    pub pubkey: String,
    pub withdrawal_credentials: String,
    pub signature: String,
    pub deposit_data_root: String,
}

impl DepositData {
    /// A copy of this deposit data with every field `0x` prefixed
    pub fn prefixed(&self) -> Self {
        Self {
            pubkey: prefix_hex(&self.pubkey),
            withdrawal_credentials: prefix_hex(&self.withdrawal_credentials),
            signature: prefix_hex(&self.signature),
            deposit_data_root: prefix_hex(&self.deposit_data_root),
        }
    }

    /// The 0x prefixed, lower case validator public key
    pub fn validator_pubkey(&self) -> String {
        prefix_hex(&self.pubkey.to_lowercase())
    }

    /// Decode every field into bytes, checking the expected lengths
    pub fn decode(&self) -> Result<DepositBytes, String> {
        Ok(DepositBytes {
            pubkey: decode_field("pubkey", &self.pubkey, PUBLIC_KEY_LENGTH)?,
            withdrawal_credentials: decode_field(
                "withdrawal_credentials",
                &self.withdrawal_credentials,
                ROOT_LENGTH,
            )?,
            signature: decode_field("signature", &self.signature, SIGNATURE_LENGTH)?,
            deposit_data_root: decode_field(
                "deposit_data_root",
                &self.deposit_data_root,
                ROOT_LENGTH,
            )?
            .try_into()
            .map_err(|_| "deposit_data_root has wrong length".to_string())?,
        })
    }
}

/// Decoded deposit data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositBytes {
    pub pubkey: Vec<u8>,
    pub withdrawal_credentials: Vec<u8>,
    pub signature: Vec<u8>,
    pub deposit_data_root: [u8; ROOT_LENGTH],
}

fn decode_field(name: &str, value: &str, expected: usize) -> Result<Vec<u8>, String> {
    let bytes = hex::decode(value.trim_start_matches("0x"))
        .map_err(|e| format!("Failed to decode {name} from hex: {e}"))?;
    if bytes.len() != expected {
        return Err(format!(
            "Invalid {name} length: expected {expected}, got {}",
            bytes.len()
        ));
    }
    Ok(bytes)
}

#[cfg(test)]
mod deposit_tests {
    use super::*;

    fn deposit() -> DepositData {
        DepositData {
            pubkey: "ab".repeat(PUBLIC_KEY_LENGTH),
            withdrawal_credentials: format!("01{}", "00".repeat(ROOT_LENGTH - 1)),
            signature: "cd".repeat(SIGNATURE_LENGTH),
            deposit_data_root: "ef".repeat(ROOT_LENGTH),
        }
    }

    #[test]
    fn test_prefixed_is_idempotent() {
        let prefixed = deposit().prefixed();
        assert!(prefixed.pubkey.starts_with("0x"));
        assert!(prefixed.deposit_data_root.starts_with("0x"));
        assert_eq!(prefixed.prefixed(), prefixed);
    }

    #[test]
    fn test_decode_prefixed_and_bare() {
        let bare = deposit().decode().expect("Failed to decode deposit data");
        let prefixed = deposit().prefixed().decode().expect("Failed to decode deposit data");
        assert_eq!(bare, prefixed);
        assert_eq!(bare.pubkey.len(), PUBLIC_KEY_LENGTH);
        assert_eq!(bare.deposit_data_root, [0xef; ROOT_LENGTH]);
    }

    #[test]
    fn test_decode_rejects_short_signature() {
        let mut data = deposit();
        data.signature = "cd".repeat(10);
        assert!(data.decode().is_err());
    }

    #[test]
    fn test_deserialize_ignores_cli_fields() {
        let json = format!(
            r#"{{"pubkey":"{}","withdrawal_credentials":"{}","amount":32000000000,"signature":"{}","deposit_message_root":"00","deposit_data_root":"{}","fork_version":"00000000","network_name":"mainnet"}}"#,
            deposit().pubkey,
            deposit().withdrawal_credentials,
            deposit().signature,
            deposit().deposit_data_root
        );
        let parsed: DepositData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, deposit());
    }
}
