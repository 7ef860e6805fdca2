//! File and environment layering.

use infra_config::{BatchConfig, ConfigError};
use rust_decimal_macros::dec;
use std::io::Write;
use tempfile::NamedTempFile;

fn toml_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
    Some(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

#[test]
fn test_defaults_without_sources() {
    let config = BatchConfig::load_with_env(None, env(&[])).unwrap();
    assert_eq!(config.timezone, "Asia/Seoul");
    assert_eq!(config.runner.max_run_secs, 3600);
    assert_eq!(config.schedules().len(), 6);
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let file = toml_file(
        r#"
        log_level = "debug"

        [rules]
        reminder_days_ahead = 5

        [rules.late_fee]
        minimum_fee = 1500

        [schedule.tier-upgrade-evaluation]
        enabled = false
        "#,
    );

    let config = BatchConfig::load_with_env(Some(file.path()), env(&[])).unwrap();
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.rules.reminder_days_ahead, 5);
    assert_eq!(config.rules.late_fee.minimum_fee, dec!(1500));
    assert_eq!(config.rules.late_fee.grace_period_days, 7);
    assert_eq!(config.rules.delinquency.credit_score_penalty, 50);

    let tier = config.schedule_for("tier-upgrade-evaluation").unwrap();
    assert!(!tier.enabled);
    assert_eq!(tier.cron, "0 3 1 * *");
}

#[test]
fn test_env_overrides_file() {
    let file = toml_file(
        r#"
        timezone = "UTC"

        [runner]
        max_concurrency = 2
        "#,
    );

    let config = BatchConfig::load_with_env(
        Some(file.path()),
        env(&[
            ("BATCH__RUNNER__MAX_CONCURRENCY", "8"),
            ("BATCH__SCHEDULE__LOAN_DEFAULTING__ENABLED", "false"),
        ]),
    )
    .unwrap();

    assert_eq!(config.timezone, "UTC");
    assert_eq!(config.runner.max_concurrency, 8);
    assert!(!config.schedule_for("loan-defaulting").unwrap().enabled);
}

#[test]
fn test_invalid_file_values_are_reported_together() {
    let file = toml_file(
        r#"
        timezone = "Nowhere/Special"

        [notification]
        queue_capacity = 0
        "#,
    );

    match BatchConfig::load_with_env(Some(file.path()), env(&[])) {
        Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
        other => panic!("Expected validation error, got {other:?}"),
    }
}

#[test]
fn test_missing_file_is_a_load_error() {
    let result = BatchConfig::load_with_env(
        Some(std::path::Path::new("/nonexistent/batch.toml")),
        env(&[]),
    );
    assert!(matches!(result, Err(ConfigError::Load(_))));
}
