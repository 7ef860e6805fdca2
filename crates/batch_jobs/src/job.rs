//! Job trait, job names and the shared collaborators every job uses.

use adapter_notify::{Notification, NotificationDispatcher};
use async_trait::async_trait;
use batch_core::domain::{Loan, LoanId, User, UserId};
use batch_core::types::time::Date;
use futures::stream::{self, StreamExt};
use infra_store::Gateways;
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use crate::error::JobError;
use crate::report::{EntityOutcome, JobReport};

/// The six scheduled jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JobName {
    InterestAccrual,
    LoanOverdueCheck,
    LateFeeApplication,
    LoanDefaulting,
    TierUpgradeEvaluation,
    RepaymentReminder,
}

impl JobName {
    /// All jobs in daily trigger order
    pub const ALL: [JobName; 6] = [
        Self::InterestAccrual,
        Self::LoanOverdueCheck,
        Self::LateFeeApplication,
        Self::LoanDefaulting,
        Self::TierUpgradeEvaluation,
        Self::RepaymentReminder,
    ];

    /// Name used in the schedule table and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InterestAccrual => "interest-accrual",
            Self::LoanOverdueCheck => "loan-overdue-check",
            Self::LateFeeApplication => "late-fee-application",
            Self::LoanDefaulting => "loan-defaulting",
            Self::TierUpgradeEvaluation => "tier-upgrade-evaluation",
            Self::RepaymentReminder => "repayment-reminder",
        }
    }
}

impl fmt::Display for JobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobName {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|job| job.as_str() == normalised)
            .ok_or_else(|| JobError::UnknownJob(s.to_string()))
    }
}

/// A scheduled job service.
///
/// `run` processes the whole candidate set for the business date `today`
/// and returns the aggregate outcome. An `Err` means the run could not
/// start (the candidate query failed); per-entity failures are reported in
/// the [`JobReport`] instead.
#[async_trait]
pub trait BatchJob: Send + Sync {
    /// Job identity
    fn name(&self) -> JobName;

    /// Process one business day
    async fn run(&self, today: Date) -> Result<JobReport, JobError>;
}

/// Collaborators shared by all jobs
#[derive(Clone)]
pub struct JobContext {
    pub gateways: Gateways,
    pub notifier: Arc<NotificationDispatcher>,
    /// Entities processed at once (1 = sequential)
    pub max_concurrency: usize,
}

impl JobContext {
    pub fn new(gateways: Gateways, notifier: Arc<NotificationDispatcher>) -> Self {
        Self {
            gateways,
            notifier,
            max_concurrency: 1,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Loan that must exist for processing to continue
    pub(crate) async fn require_loan(&self, id: LoanId) -> Result<Loan, JobError> {
        self.gateways
            .loans
            .find_loan(id)
            .await?
            .ok_or_else(|| JobError::missing("loan", id))
    }

    /// Send `build(user)` to `user_id`. Lookup and delivery problems are
    /// logged and reported as `false`.
    pub(crate) async fn notify_user<F>(&self, user_id: UserId, build: F) -> bool
    where
        F: FnOnce(&User) -> Notification + Send,
    {
        let user = match self.gateways.users.find_user(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(user_id, "Notification skipped: user not found");
                return false;
            }
            Err(e) => {
                warn!(user_id, error = %e, "Notification skipped: user lookup failed");
                return false;
            }
        };
        let notification = build(&user);
        self.notifier.dispatch(&user.recipients(), notification).await
    }

    /// Like [`JobContext::notify_user`] for the owner of `loan_id`
    pub(crate) async fn notify_borrower<F>(&self, loan_id: LoanId, build: F) -> bool
    where
        F: FnOnce(&Loan, &User) -> Notification + Send,
    {
        let loan = match self.gateways.loans.find_loan(loan_id).await {
            Ok(Some(loan)) => loan,
            Ok(None) => {
                warn!(loan_id, "Notification skipped: loan not found");
                return false;
            }
            Err(e) => {
                warn!(loan_id, error = %e, "Notification skipped: loan lookup failed");
                return false;
            }
        };
        self.notify_user(loan.user_id, |user| build(&loan, user)).await
    }

    /// Run `work` over every candidate with at most `max_concurrency` in
    /// flight, folding the results into one report.
    ///
    /// Candidates are de-duplicated by `key` first so no two workers ever
    /// touch the same entity.
    pub(crate) async fn process_all<T, K, W, Fut>(
        &self,
        job: JobName,
        entity: &'static str,
        candidates: Vec<T>,
        key: K,
        work: W,
    ) -> JobReport
    where
        K: Fn(&T) -> u64,
        W: Fn(T) -> Fut,
        Fut: Future<Output = Result<EntityOutcome, JobError>>,
    {
        let start = Instant::now();
        let mut seen = HashSet::new();
        let candidates: Vec<(u64, T)> = candidates
            .into_iter()
            .map(|item| (key(&item), item))
            .filter(|(id, _)| seen.insert(*id))
            .collect();

        let mut report = JobReport::new(job);
        report.processed = candidates.len();

        let mut results = stream::iter(candidates)
            .map(|(id, item)| {
                let fut = work(item);
                async move { (id, fut.await) }
            })
            .buffer_unordered(self.max_concurrency.max(1));

        while let Some((id, result)) = results.next().await {
            report.record(&format!("{} {}", entity, id), result);
        }

        report.duration = start.elapsed();
        report
    }
}
