//! Error types for structured error handling.
//!
//! This module provides:
//! - `DateError`: Errors from date construction and parsing
//! - `DomainError`: Rejected entity state transitions and amount violations

use thiserror::Error;

/// Date-related errors.
///
/// # Examples
/// ```
/// use batch_core::types::error::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    #[error("Invalid date: {year}-{month}-{day}")]
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse date string.
    #[error("Date parse error: {0}")]
    ParseError(String),
}

/// Violations of an entity's state machine or money invariants.
///
/// Raised by entity methods; jobs treat them as a per-entity failure or a
/// deliberate skip, never as a reason to abort the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A status change that the lifecycle does not allow
    #[error("Invalid {entity} transition: {from} -> {to}")]
    InvalidTransition {
        /// Entity kind ("loan", "repayment", ...)
        entity: &'static str,
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// A tier change that is not an upgrade
    #[error("Tier {to} is not an upgrade from {from}")]
    NotAnUpgrade {
        /// Current tier
        from: String,
        /// Requested tier
        to: String,
    },

    /// Monetary amount outside its allowed range
    #[error("Negative amount for {field}: {value}")]
    NegativeAmount {
        /// Field name
        field: &'static str,
        /// Offending value
        value: String,
    },
}

impl DomainError {
    /// Create an invalid transition error
    pub fn transition(
        entity: &'static str,
        from: impl std::fmt::Display,
        to: impl std::fmt::Display,
    ) -> Self {
        Self::InvalidTransition {
            entity,
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_display() {
        let err = DomainError::transition("loan", "DEFAULTED", "ACTIVE");
        assert_eq!(err.to_string(), "Invalid loan transition: DEFAULTED -> ACTIVE");
    }
}
