//! # batch_jobs: Job Services of the Lending Batch Engine
//!
//! Each job pulls a candidate set through a query gateway and, entity by
//! entity, applies a calculator from `batch_core`, persists the change and
//! dispatches a notification:
//!
//! | Job | Candidates | Effect |
//! |---|---|---|
//! | [`SavingsInterestJob`] | active accounts | accrue, compound at month end, snapshot |
//! | [`LoanOverdueJob`] | scheduled, due before today | mark OVERDUE |
//! | [`LateFeeJob`] | overdue | charge late fee |
//! | [`LoanDefaultJob`] | overdue, grouped by loan | mark loan DEFAULTED, credit penalty |
//! | [`TierUpgradeJob`] | active accounts | upgrade tier |
//! | [`RepaymentReminderJob`] | scheduled, due in N days | remind |
//!
//! A failing entity is logged and counted in the [`JobReport`]; the run
//! carries on with the next one. State is always saved before the
//! notification is attempted, and a failed notification never undoes it.
//!
//! [`SavingsInterestJob`]: jobs::SavingsInterestJob
//! [`LoanOverdueJob`]: jobs::LoanOverdueJob
//! [`LateFeeJob`]: jobs::LateFeeJob
//! [`LoanDefaultJob`]: jobs::LoanDefaultJob
//! [`TierUpgradeJob`]: jobs::TierUpgradeJob
//! [`RepaymentReminderJob`]: jobs::RepaymentReminderJob

pub mod error;
pub mod job;
pub mod jobs;
pub mod report;

pub use error::JobError;
pub use job::{BatchJob, JobContext, JobName};
pub use report::{EntityOutcome, JobReport};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::JobError;
    pub use crate::job::{BatchJob, JobContext, JobName};
    pub use crate::jobs::*;
    pub use crate::report::JobReport;
}
