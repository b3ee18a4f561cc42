//! Credential store error types.

use thiserror::Error;

/// A result type using `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur when reading or writing persisted credentials.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted record could not be encoded or decoded.
    #[error("credential record corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
