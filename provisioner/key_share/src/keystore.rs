use crate::error::KeyShareError;
use bls::{PublicKey, SecretKey};
use eth2_keystore::{Error as KeystoreError, Keystore};
use tracing::debug;

/// A decrypted validator key.
///
/// Neither `Debug` nor `Clone`. The secret is only reachable through [`crate::split`], which
/// consumes it, and the underlying [`SecretKey`] is zeroized when dropped.
pub struct ValidatorKeyMaterial {
    pub(crate) validator_pubkey: PublicKey,
    pub(crate) secret_key: SecretKey,
}

impl ValidatorKeyMaterial {
    pub(crate) fn new(secret_key: SecretKey) -> Self {
        Self {
            validator_pubkey: secret_key.public_key(),
            secret_key,
        }
    }

    pub fn validator_pubkey(&self) -> &PublicKey {
        &self.validator_pubkey
    }

    /// 0x prefixed, lower case hex of the validator public key
    pub fn validator_pubkey_hex(&self) -> String {
        format!("0x{}", hex::encode(self.validator_pubkey.serialize()))
    }
}

/// Decrypt an EIP-2335 keystore into the validator key it protects.
pub fn decrypt_keystore(
    keystore_json: &str,
    password: &str,
) -> Result<ValidatorKeyMaterial, KeyShareError> {
    let keystore = Keystore::from_json_str(keystore_json)
        .map_err(|e| KeyShareError::MalformedKeystore(format!("{e:?}")))?;

    let keypair = keystore
        .decrypt_keypair(password.as_bytes())
        .map_err(|e| match e {
            KeystoreError::InvalidPassword => KeyShareError::InvalidPassword,
            other => KeyShareError::MalformedKeystore(format!("{other:?}")),
        })?;

    let material = ValidatorKeyMaterial::new(keypair.sk);
    debug!(validator = %material.validator_pubkey_hex(), "Decrypted keystore");
    Ok(material)
}
