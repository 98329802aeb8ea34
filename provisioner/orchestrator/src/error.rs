use std::fmt::Display;

/// Errors that abort a whole provisioning run. Failures of a single validator are never
/// surfaced this way, they are recorded as a [`crate::ProvisioningStatus`] instead.
#[derive(Debug)]
pub enum ProvisioningError {
    /// The operator registry could not be queried
    DirectoryUnavailable(String),
    /// The fetched operators do not form a single committee of the configured size
    NoCommittees {
        operators: usize,
        committee_size: usize,
    },
    /// The selection policy does not resolve to a committee
    CommitteeSelection(String),
    /// A keystore or deposit entry of the run is missing or unreadable
    KeystoreStore { index: usize, reason: String },
}

impl Display for ProvisioningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for ProvisioningError {}

// Errors from a keystore store
#[derive(Debug)]
pub enum StoreError {
    NotFound(String),
    Io(String),
    Malformed(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for StoreError {}

/// Errors from submitting a transaction to chain. The message of the underlying transport or
/// revert is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The submission could not be encoded
    InvalidInput(String),
    /// The node could not be reached or refused the transaction
    Transport(String),
    /// The transaction was included but reverted
    Reverted(String),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(e) => write!(f, "invalid input: {e}"),
            Self::Transport(e) => write!(f, "transport error: {e}"),
            Self::Reverted(e) => write!(f, "reverted: {e}"),
        }
    }
}

impl std::error::Error for GatewayError {}
