use crate::error::KeyShareError;
use bls::SecretKey;
use openssl::pkey::{Private, Public};
use openssl::rsa::{Padding, Rsa};
use zeroize::Zeroizing;

/// Encrypt a share key to an operator's RSA public key.
///
/// The plaintext is the 0x prefixed hex encoding of the share key, padded with PKCS#1 v1.5, which
/// is what SSV operator nodes decrypt. Padding is randomised, so repeated calls differ.
pub fn encrypt_share(share: &SecretKey, rsa_pubkey: &Rsa<Public>) -> Result<Vec<u8>, KeyShareError> {
    let serialized = share.serialize();
    let plaintext = Zeroizing::new(format!("0x{}", hex::encode(serialized.as_bytes())));

    let mut ciphertext = vec![0u8; rsa_pubkey.size() as usize];
    let len = rsa_pubkey
        .public_encrypt(plaintext.as_bytes(), &mut ciphertext, Padding::PKCS1)
        .map_err(|e| KeyShareError::Crypto(format!("RSA encryption failed: {e}")))?;
    ciphertext.truncate(len);
    Ok(ciphertext)
}

/// Decrypt a share key with the operator's RSA private key.
pub fn decrypt_share(
    ciphertext: &[u8],
    rsa_key: &Rsa<Private>,
) -> Result<SecretKey, KeyShareError> {
    let mut plaintext = Zeroizing::new(vec![0u8; rsa_key.size() as usize]);
    let len = rsa_key
        .private_decrypt(ciphertext, &mut plaintext, Padding::PKCS1)
        .map_err(|e| KeyShareError::Crypto(format!("RSA decryption failed: {e}")))?;

    let encoded = plaintext
        .get(..len)
        .and_then(|bytes| bytes.strip_prefix(b"0x"))
        .ok_or_else(|| KeyShareError::Crypto("share plaintext is not 0x hex".to_string()))?;
    let bytes = Zeroizing::new(
        hex::decode(encoded)
            .map_err(|e| KeyShareError::Crypto(format!("share plaintext is not hex: {e}")))?,
    );
    SecretKey::deserialize(&bytes)
        .map_err(|e| KeyShareError::Crypto(format!("invalid share key: {e:?}")))
}
