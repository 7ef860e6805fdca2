//! Storage error types.

use thiserror::Error;

/// Result alias for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage failures surfaced to the job layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No row with this id
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind
        entity: &'static str,
        /// Requested id
        id: u64,
    },

    /// The row changed since it was read
    #[error("{entity} {id} was modified concurrently (read at version {expected}, stored {found})")]
    VersionConflict {
        /// Entity kind
        entity: &'static str,
        /// Entity id
        id: u64,
        /// Version the caller read
        expected: u64,
        /// Version currently stored
        found: u64,
    },

    /// An append-only record already exists
    #[error("Duplicate {entity}: {key}")]
    Duplicate {
        /// Entity kind
        entity: &'static str,
        /// Natural key of the existing record
        key: String,
    },

    /// The backend could not serve the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}
