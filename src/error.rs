use std::fmt;

/// Unified error type for the storefront crate.
#[derive(Debug, Clone)]
pub enum CoreError {
    /// Invalid input provided by the caller.
    InvalidInput(String),
    /// A catalog slug lookup failed at the service level.
    ///
    /// An unmatched slug is not a `Lookup` error; it resolves to an empty
    /// field instead.
    Lookup(String),
    /// A product listing fetch failed at the service level.
    Listing(String),
    /// Internal error.
    Internal(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            CoreError::Lookup(msg) => write!(f, "catalog lookup failed: {msg}"),
            CoreError::Listing(msg) => write!(f, "listing fetch failed: {msg}"),
            CoreError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;
