//! Per-run outcome accounting.

use std::time::Duration;
use tracing::warn;

use crate::error::JobError;
use crate::job::JobName;

/// What happened to one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityOutcome {
    /// Work was applied; `notify_failed` is set when the follow-up
    /// notification could not be dispatched
    Done { notify_failed: bool },
    /// Nothing to do for this entity
    Skipped,
}

impl EntityOutcome {
    /// Work applied, no notification involved
    pub fn done() -> Self {
        Self::Done {
            notify_failed: false,
        }
    }

    /// Work applied and a notification attempted
    pub fn notified(sent: bool) -> Self {
        Self::Done {
            notify_failed: !sent,
        }
    }
}

/// Aggregate result of one job run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    /// Job that produced the report
    pub job: JobName,
    /// Entities in the candidate set
    pub processed: usize,
    /// Entities changed or acted on
    pub succeeded: usize,
    /// Entities whose processing raised an error
    pub failed: usize,
    /// Entities that needed no work
    pub skipped: usize,
    /// Notifications that could not be dispatched
    pub notifications_failed: usize,
    /// One line per failed entity
    pub errors: Vec<String>,
    /// Wall-clock time of the run
    pub duration: Duration,
}

impl JobReport {
    /// Empty report for `job`
    pub fn new(job: JobName) -> Self {
        Self {
            job,
            processed: 0,
            succeeded: 0,
            failed: 0,
            skipped: 0,
            notifications_failed: 0,
            errors: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    /// True when no entity failed
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Fold one entity result into the report
    pub(crate) fn record(&mut self, label: &str, result: Result<EntityOutcome, JobError>) {
        match result {
            Ok(EntityOutcome::Done { notify_failed }) => {
                self.succeeded += 1;
                if notify_failed {
                    self.notifications_failed += 1;
                }
            }
            Ok(EntityOutcome::Skipped) => self.skipped += 1,
            Err(e) => {
                warn!(job = %self.job, entity = label, error = %e, "Entity processing failed");
                self.failed += 1;
                self.errors.push(format!("{}: {}", label, e));
            }
        }
    }
}
