//! Scheduler error types.

use batch_jobs::JobError;
use infra_config::ConfigError;
use thiserror::Error;

/// Errors raised while wiring or driving the schedule
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A cron expression did not parse
    #[error("Invalid cron expression '{expr}' for {job}: {reason}")]
    InvalidCron {
        job: String,
        expr: String,
        reason: String,
    },

    /// A timezone name is not in the IANA database
    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Job(#[from] JobError),
}

impl SchedulerError {
    /// Create an invalid-cron error
    pub fn invalid_cron(job: impl Into<String>, expr: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidCron {
            job: job.into(),
            expr: expr.into(),
            reason: reason.to_string(),
        }
    }
}
