//! Configuration error types.

use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialised
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// Every problem found by [`crate::BatchConfig::validate`]
    #[error("Configuration validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}
