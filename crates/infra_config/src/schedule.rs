//! Job trigger table.
//!
//! Every job has a built-in five-field cron expression. The `[schedule]`
//! table may override the expression, the timezone or switch a job off:
//!
//! ```toml
//! [schedule.repayment-reminder]
//! cron = "0 10 * * *"
//! timezone = "Europe/London"
//!
//! [schedule.tier-upgrade-evaluation]
//! enabled = false
//! ```
//!
//! Keys may use either `kebab-case` or `snake_case`, so the table can also be
//! set from the environment (`BATCH__SCHEDULE__LATE_FEE_APPLICATION__ENABLED`).

use serde::Deserialize;

/// Built-in trigger of each job, in minute-hour-day-month-weekday form
pub const DEFAULT_SCHEDULE: [(&str, &str); 6] = [
    ("interest-accrual", "1 0 * * *"),
    ("loan-overdue-check", "30 0 * * *"),
    ("late-fee-application", "0 1 * * *"),
    ("loan-defaulting", "0 2 * * *"),
    ("tier-upgrade-evaluation", "0 3 1 * *"),
    ("repayment-reminder", "0 9 * * *"),
];

/// Per-job overrides as written in the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JobSchedule {
    /// Cron expression replacing the built-in one
    pub cron: Option<String>,
    /// Whether the job is scheduled at all (on unless set)
    pub enabled: Option<bool>,
    /// IANA timezone replacing the global one
    pub timezone: Option<String>,
}

impl JobSchedule {
    /// Field-wise overlay; values set in `other` win
    pub(crate) fn overlay(&self, other: &JobSchedule) -> JobSchedule {
        JobSchedule {
            cron: other.cron.clone().or_else(|| self.cron.clone()),
            enabled: other.enabled.or(self.enabled),
            timezone: other.timezone.clone().or_else(|| self.timezone.clone()),
        }
    }
}

/// Effective trigger of one job after overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchedule {
    pub job: &'static str,
    pub cron: String,
    pub timezone: String,
    pub enabled: bool,
}

/// Canonical job name for a config key
pub(crate) fn canonical_job(key: &str) -> Option<&'static str> {
    let normalised = key.replace('_', "-");
    DEFAULT_SCHEDULE
        .iter()
        .map(|(name, _)| *name)
        .find(|name| *name == normalised)
}

pub(crate) fn default_cron(job: &str) -> Option<&'static str> {
    DEFAULT_SCHEDULE
        .iter()
        .find(|(name, _)| *name == job)
        .map(|(_, cron)| *cron)
}
