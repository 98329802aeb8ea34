use std::fmt::Display;

// Errors raised while decrypting or splitting a validator key. None of them carry key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyShareError {
    /// The keystore password does not decrypt the keystore
    InvalidPassword,
    /// The keystore could not be parsed or its parameters are unsupported
    MalformedKeystore(String),
    /// The committee has fewer members than the smallest fault tolerant committee
    CommitteeTooSmall { size: usize, minimum: usize },
    /// The committee cannot form a 3f+1 quorum
    InvalidCommittee(String),
    /// Share derivation, key conversion or encryption failed
    Crypto(String),
}

impl Display for KeyShareError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPassword => write!(f, "invalid keystore password"),
            Self::MalformedKeystore(e) => write!(f, "malformed keystore: {e}"),
            Self::CommitteeTooSmall { size, minimum } => write!(
                f,
                "committee too small: {size} operators, at least {minimum} required"
            ),
            Self::InvalidCommittee(e) => write!(f, "invalid committee: {e}"),
            Self::Crypto(e) => write!(f, "cryptographic error: {e}"),
        }
    }
}

impl std::error::Error for KeyShareError {}
