//! Job error types.

use batch_core::types::error::DomainError;
use infra_store::StoreError;
use thiserror::Error;

/// Errors raised by job services.
///
/// Only [`JobError::Query`] aborts a run; every other variant is raised for
/// a single entity, logged, counted and the run moves on.
#[derive(Debug, Error)]
pub enum JobError {
    /// The candidate set could not be fetched
    #[error("Candidate query failed: {0}")]
    Query(#[source] StoreError),

    /// Persisting one entity failed
    #[error("Persistence failed: {0}")]
    Store(#[from] StoreError),

    /// The state machine refused a transition
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A referenced entity does not exist
    #[error("{entity} {id} not found")]
    MissingEntity { entity: &'static str, id: u64 },

    /// A job name that is not in the table
    #[error("Unknown job '{0}'")]
    UnknownJob(String),
}

impl JobError {
    /// Create a missing-entity error
    pub fn missing(entity: &'static str, id: u64) -> Self {
        Self::MissingEntity { entity, id }
    }
}
