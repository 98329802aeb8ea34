//! Splitting of validator signing keys into operator key shares.
//!
//! A validator key is decrypted from its EIP-2335 keystore, split with Shamir secret sharing over
//! the BLS12-381 scalar field (one evaluation point per operator id), and every share is encrypted
//! to the RSA key of the operator that will hold it. Nothing in this crate performs network or
//! disk I/O.

pub use encryption::{decrypt_share, encrypt_share};
pub use error::KeyShareError;
pub use keystore::{decrypt_keystore, ValidatorKeyMaterial};
pub use splitter::split;
pub use threshold::{reconstruct_secret_key, split_secret, reconstruct_secret};

mod encryption;
mod error;
mod keystore;
mod splitter;
mod threshold;
