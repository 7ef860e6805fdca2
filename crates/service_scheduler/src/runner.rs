//! Job runner: timing, logging and failure containment around one run.
//!
//! [`JobRunner::run`] never returns an error. Whatever the job does, the
//! caller gets a [`RunRecord`]:
//!
//! - a second trigger while the same job is still running is skipped
//! - a run longer than the configured limit is aborted
//! - a panic inside the job is caught by the task boundary
//!
//! There is no automatic retry; the next trigger is the retry.

use batch_core::types::time::{format_duration, Date};
use batch_jobs::{BatchJob, JobName, JobReport};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The job finished; per-entity failures are inside the report
    Succeeded(JobReport),
    /// The job could not run or panicked
    Failed(String),
    /// Aborted after the run-time limit
    TimedOut,
    /// Not started because the previous run was still in progress
    SkippedOverlap,
}

impl RunOutcome {
    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
            Self::TimedOut => "timed_out",
            Self::SkippedOverlap => "skipped_overlap",
        }
    }
}

/// One run of one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub job: JobName,
    /// Business date the job processed
    pub business_date: Date,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub outcome: RunOutcome,
}

/// Removes the job from the running set when the run ends, however it ends
struct RunGuard {
    running: Arc<Mutex<HashSet<JobName>>>,
    job: JobName,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.job);
    }
}

/// Wraps job runs with a per-job run-lock, a time limit and logging
pub struct JobRunner {
    max_run_time: Duration,
    running: Arc<Mutex<HashSet<JobName>>>,
    last: RwLock<HashMap<JobName, RunRecord>>,
}

impl JobRunner {
    /// Create a runner that aborts runs after `max_run_time`
    pub fn new(max_run_time: Duration) -> Self {
        Self {
            max_run_time,
            running: Arc::new(Mutex::new(HashSet::new())),
            last: RwLock::new(HashMap::new()),
        }
    }

    fn try_lock(&self, job: JobName) -> Option<RunGuard> {
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        if !running.insert(job) {
            return None;
        }
        Some(RunGuard {
            running: Arc::clone(&self.running),
            job,
        })
    }

    /// Whether `job` is running right now
    pub fn is_running(&self, job: JobName) -> bool {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&job)
    }

    /// Most recent record of `job`, if it ever ran
    pub fn last_outcome(&self, job: JobName) -> Option<RunRecord> {
        self.last
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&job)
            .cloned()
    }

    /// Run `job` for `business_date`
    pub async fn run(&self, job: Arc<dyn BatchJob>, business_date: Date) -> RunRecord {
        let name = job.name();
        let started_at = Utc::now();
        let start = Instant::now();

        let Some(_guard) = self.try_lock(name) else {
            warn!(job = %name, %business_date, "Previous run still in progress, trigger skipped");
            return self.finish(name, business_date, started_at, start, RunOutcome::SkippedOverlap);
        };

        info!(job = %name, %business_date, "Job started");

        let mut handle = tokio::spawn(async move { job.run(business_date).await });
        let outcome = match tokio::time::timeout(self.max_run_time, &mut handle).await {
            Ok(Ok(Ok(report))) => RunOutcome::Succeeded(report),
            Ok(Ok(Err(e))) => RunOutcome::Failed(e.to_string()),
            Ok(Err(e)) if e.is_panic() => RunOutcome::Failed(format!("job panicked: {}", e)),
            Ok(Err(e)) => RunOutcome::Failed(e.to_string()),
            Err(_) => {
                handle.abort();
                RunOutcome::TimedOut
            }
        };

        self.finish(name, business_date, started_at, start, outcome)
    }

    fn finish(
        &self,
        job: JobName,
        business_date: Date,
        started_at: DateTime<Utc>,
        start: Instant,
        outcome: RunOutcome,
    ) -> RunRecord {
        let duration = start.elapsed();
        let took = format_duration(duration);

        match &outcome {
            RunOutcome::Succeeded(report) => info!(
                job = %job,
                %business_date,
                duration = %took,
                processed = report.processed,
                succeeded = report.succeeded,
                failed = report.failed,
                skipped = report.skipped,
                notifications_failed = report.notifications_failed,
                "Job finished"
            ),
            RunOutcome::Failed(reason) => error!(
                job = %job,
                %business_date,
                duration = %took,
                error = %reason,
                "Job failed"
            ),
            RunOutcome::TimedOut => error!(
                job = %job,
                %business_date,
                duration = %took,
                limit = %format_duration(self.max_run_time),
                "Job aborted after time limit"
            ),
            RunOutcome::SkippedOverlap => {}
        }

        let record = RunRecord {
            job,
            business_date,
            started_at,
            duration,
            outcome,
        };
        // An overlap skip says nothing about the run still in progress
        if record.outcome != RunOutcome::SkippedOverlap {
            self.last
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(job, record.clone());
        }
        record
    }
}
