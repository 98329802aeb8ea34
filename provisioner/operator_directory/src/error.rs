use std::fmt::Display;

// Errors surfaced while building the operator directory
#[derive(Debug)]
pub enum DirectoryError {
    /// The registry could not be reached, answered with an error status or a malformed payload
    Unavailable(String),
    /// The registry client could not be constructed from its configuration
    InvalidConfig(String),
}

impl Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for DirectoryError {}
