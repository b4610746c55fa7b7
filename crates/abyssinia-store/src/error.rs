//! Store error types.

use abyssinia_commerce::error::PersistenceError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur when using the store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    Open(String),

    /// A stored value could not be decoded.
    #[error("Failed to decode stored value: {0}")]
    Decode(#[source] serde_json::Error),

    /// A value could not be encoded for storage.
    #[error("Failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),

    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The write would take the store over its byte quota.
    #[error("Quota exceeded: {used} of {limit} bytes")]
    QuotaExceeded { used: usize, limit: usize },
}

impl StoreError {
    /// Check if the error came from undecodable stored data.
    pub fn is_corrupt_data(&self) -> bool {
        matches!(self, StoreError::Decode(_))
    }
}

impl From<StoreError> for PersistenceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::QuotaExceeded { used, limit } => {
                PersistenceError::QuotaExceeded { used, limit }
            }
            StoreError::Decode(e) => PersistenceError::CorruptData(e.to_string()),
            StoreError::Encode(e) => PersistenceError::Serialization(e.to_string()),
            other => PersistenceError::Unavailable(other.to_string()),
        }
    }
}
