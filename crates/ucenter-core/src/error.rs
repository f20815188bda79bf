// Error types for error event queries

use thiserror::Error;

/// Result type alias for error event operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while querying error events
#[derive(Debug, Error)]
pub enum Error {
    /// Store communication failure (connection lost, timeout, driver error)
    #[error("Store error: {0}")]
    Store(String),

    /// Operation was cancelled before it completed
    #[error("Operation cancelled")]
    Cancelled,

    /// Page number or page size outside the accepted range
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),
}

impl Error {
    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Error::Store(msg.into())
    }

    /// Create an invalid pagination error
    pub fn invalid_pagination(msg: impl Into<String>) -> Self {
        Error::InvalidPagination(msg.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}
