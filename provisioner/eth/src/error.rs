use std::fmt::Display;

// Errors of the health precheck
#[derive(Debug, PartialEq, Eq)]
pub enum PrecheckError {
    RpcError(String),
    /// Fewer keystores are prepared than validators the pool can fund
    InsufficientKeystores { validators: usize, keystores: usize },
    Misc(String),
}

impl Display for PrecheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for PrecheckError {}
