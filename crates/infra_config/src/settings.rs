//! Batch engine configuration.
//!
//! Sources are layered, later ones winning:
//!
//! 1. Built-in defaults (every field has one)
//! 2. Optional TOML file
//! 3. `BATCH__`-prefixed environment variables, `__` separating sections,
//!    e.g. `BATCH__RUNNER__MAX_CONCURRENCY=4`

use batch_core::calculators::delinquency::DelinquencyPolicy;
use batch_core::calculators::late_fee::LateFeePolicy;
use chrono_tz::Tz;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;
use crate::schedule::{canonical_job, default_cron, JobSchedule, ResolvedSchedule, DEFAULT_SCHEDULE};

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "BATCH";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Default tracing filter
    pub log_level: String,
    /// IANA timezone that defines "today" and cron wall-clock time
    pub timezone: String,
    /// Per-job trigger overrides keyed by job name
    pub schedule: BTreeMap<String, JobSchedule>,
    /// Business rules
    pub rules: RulesConfig,
    /// Job runner limits
    pub runner: RunnerConfig,
    /// Notification delivery
    pub notification: NotificationConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            timezone: "Asia/Seoul".to_string(),
            schedule: BTreeMap::new(),
            rules: RulesConfig::default(),
            runner: RunnerConfig::default(),
            notification: NotificationConfig::default(),
        }
    }
}

/// Business rule parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub late_fee: LateFeePolicy,
    pub delinquency: DelinquencyPolicy,
    /// Days before the due date a reminder is sent
    pub reminder_days_ahead: i64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            late_fee: LateFeePolicy::default(),
            delinquency: DelinquencyPolicy::default(),
            reminder_days_ahead: 3,
        }
    }
}

/// Job runner limits
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Upper bound on a single run before it is aborted
    pub max_run_secs: u64,
    /// Entities processed at once inside a job (1 = sequential)
    pub max_concurrency: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_run_secs: 3600,
            max_concurrency: 1,
        }
    }
}

/// Notification delivery settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Capacity of the fire-and-forget delivery queue
    pub queue_capacity: usize,
    pub smtp_server: String,
    pub from_address: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            smtp_server: "smtp.lending.local".to_string(),
            from_address: "no-reply@lending.local".to_string(),
        }
    }
}

impl BatchConfig {
    /// Load defaults, then `path` if given, then the process environment,
    /// and validate the result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Like [`BatchConfig::load`] but reads overrides from `env` instead of
    /// the process environment when it is `Some`.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let config: BatchConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Global timezone
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        parse_tz(&self.timezone).map_err(|e| ConfigError::Validation(vec![e]))
    }

    /// Effective trigger of `job`, or `None` for an unknown job name
    pub fn schedule_for(&self, job: &str) -> Option<ResolvedSchedule> {
        let name = canonical_job(job)?;
        let overrides = self
            .schedule
            .iter()
            .filter(|(key, _)| canonical_job(key) == Some(name))
            .fold(JobSchedule::default(), |acc, (_, entry)| acc.overlay(entry));

        Some(ResolvedSchedule {
            job: name,
            cron: overrides
                .cron
                .unwrap_or_else(|| default_cron(name).unwrap_or_default().to_string()),
            timezone: overrides.timezone.unwrap_or_else(|| self.timezone.clone()),
            enabled: overrides.enabled.unwrap_or(true),
        })
    }

    /// Effective triggers of every job, in built-in order
    pub fn schedules(&self) -> Vec<ResolvedSchedule> {
        DEFAULT_SCHEDULE
            .iter()
            .filter_map(|(job, _)| self.schedule_for(job))
            .collect()
    }

    /// Check every field, reporting all problems at once
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, VALID_LOG_LEVELS
            ));
        }

        if let Err(e) = parse_tz(&self.timezone) {
            errors.push(e);
        }

        for (key, entry) in &self.schedule {
            if canonical_job(key).is_none() {
                errors.push(format!("Unknown job '{}' in [schedule]", key));
                continue;
            }
            if let Some(cron) = &entry.cron {
                let fields = cron.split_whitespace().count();
                if fields != 5 {
                    errors.push(format!(
                        "schedule.{}.cron '{}' must have 5 fields, found {}",
                        key, cron, fields
                    ));
                }
            }
            if let Some(tz) = &entry.timezone {
                if let Err(e) = parse_tz(tz) {
                    errors.push(format!("schedule.{}: {}", key, e));
                }
            }
        }

        let late_fee = &self.rules.late_fee;
        if late_fee.grace_period_days < 0 {
            errors.push("rules.late_fee.grace_period_days must not be negative".to_string());
        }
        if late_fee.cutoff_days <= late_fee.grace_period_days {
            errors.push(format!(
                "rules.late_fee.cutoff_days ({}) must be greater than grace_period_days ({})",
                late_fee.cutoff_days, late_fee.grace_period_days
            ));
        }
        if late_fee.minimum_fee.is_sign_negative()
            || late_fee.due_amount_rate.is_sign_negative()
            || late_fee.principal_cap_rate.is_sign_negative()
        {
            errors.push("rules.late_fee amounts and rates must not be negative".to_string());
        }
        if self.rules.delinquency.default_threshold_days <= 0 {
            errors.push("rules.delinquency.default_threshold_days must be positive".to_string());
        }
        if self.rules.reminder_days_ahead < 0 {
            errors.push("rules.reminder_days_ahead must not be negative".to_string());
        }

        if self.runner.max_run_secs == 0 {
            errors.push("runner.max_run_secs must be greater than 0".to_string());
        }
        if self.runner.max_concurrency == 0 {
            errors.push("runner.max_concurrency must be greater than 0".to_string());
        }
        if self.notification.queue_capacity == 0 {
            errors.push("notification.queue_capacity must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

fn parse_tz(name: &str) -> Result<Tz, String> {
    name.parse::<Tz>()
        .map_err(|_| format!("Unknown timezone '{}'", name))
}
