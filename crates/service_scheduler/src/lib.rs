//! # service_scheduler: Scheduling Service of the Lending Batch Engine
//!
//! The service layer that turns the job services into an unattended
//! process:
//!
//! - [`runner`]: wraps each run with a run-lock, a time limit, panic
//!   containment and logging
//! - [`scheduler`]: cron triggers evaluated in a fixed timezone
//! - [`app`]: the composition root wiring configuration, storage,
//!   notification and jobs together
//!
//! The `lending-batch` binary loads configuration, builds an [`App`] over
//! the in-memory reference store and either runs the schedule until
//! Ctrl-C or runs a single job with `--run-now`.

pub mod app;
pub mod error;
pub mod runner;
pub mod scheduler;

pub use app::App;
pub use error::SchedulerError;
pub use runner::{JobRunner, RunOutcome, RunRecord};
pub use scheduler::{Scheduler, Trigger};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::app::App;
    pub use crate::error::SchedulerError;
    pub use crate::runner::{JobRunner, RunOutcome, RunRecord};
    pub use crate::scheduler::{Scheduler, Trigger};
}
