//! # infra_config: Configuration for the Lending Batch Engine
//!
//! Loads [`BatchConfig`] from built-in defaults, an optional TOML file and
//! `BATCH__` environment variables, then validates it as a whole.
//!
//! ```rust
//! use infra_config::BatchConfig;
//!
//! let config = BatchConfig::default();
//! let reminder = config.schedule_for("repayment-reminder").unwrap();
//! assert_eq!(reminder.cron, "0 9 * * *");
//! assert_eq!(reminder.timezone, "Asia/Seoul");
//! ```

pub mod error;
pub mod schedule;
pub mod settings;

pub use error::ConfigError;
pub use schedule::{JobSchedule, ResolvedSchedule, DEFAULT_SCHEDULE};
pub use settings::{BatchConfig, NotificationConfig, RulesConfig, RunnerConfig, ENV_PREFIX};
