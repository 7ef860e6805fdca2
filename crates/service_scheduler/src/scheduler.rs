//! Wall-clock triggers.
//!
//! Each job gets its own loop: compute the next fire time from its cron
//! expression in its timezone, sleep until then, run it through the
//! [`JobRunner`], and only then compute the following fire time. A job
//! therefore never overlaps itself, and a run that overshoots its next slot
//! simply waits for the one after.

use batch_core::types::time::Date;
use batch_jobs::{BatchJob, JobName};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::SchedulerError;
use crate::runner::JobRunner;

/// When one job fires
#[derive(Debug, Clone)]
pub struct Trigger {
    job: JobName,
    expression: String,
    schedule: Schedule,
    timezone: Tz,
}

impl Trigger {
    /// Parse a five-field cron expression (minute hour day month weekday)
    /// evaluated in `timezone`.
    pub fn parse(job: JobName, expression: &str, timezone: &str) -> Result<Self, SchedulerError> {
        let fields: Vec<&str> = expression.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(SchedulerError::invalid_cron(
                job.as_str(),
                expression,
                format!("expected 5 fields, found {}", fields.len()),
            ));
        }
        let weekdays = weekday_field(fields[4])
            .map_err(|reason| SchedulerError::invalid_cron(job.as_str(), expression, reason))?;
        // The cron crate wants a leading seconds field
        let translated = format!(
            "0 {} {} {} {} {}",
            fields[0], fields[1], fields[2], fields[3], weekdays
        );
        let schedule = Schedule::from_str(&translated)
            .map_err(|e| SchedulerError::invalid_cron(job.as_str(), expression, e))?;
        let timezone = timezone
            .parse::<Tz>()
            .map_err(|_| SchedulerError::UnknownTimezone(timezone.to_string()))?;

        Ok(Self {
            job,
            expression: expression.to_string(),
            schedule,
            timezone,
        })
    }

    pub fn job(&self) -> JobName {
        self.job
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// First fire time strictly after `after`
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule
            .after(&after.with_timezone(&self.timezone))
            .next()
            .map(|at| at.with_timezone(&Utc))
    }

    /// Business date of a fire time, in the trigger's timezone
    pub fn business_date(&self, fired_at: DateTime<Utc>) -> Date {
        Date::at(fired_at, self.timezone)
    }
}

const WEEKDAYS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// One weekday token: 0-7 (Sunday is 0 or 7) or a three-letter name
fn weekday(token: &str) -> Result<usize, String> {
    if let Ok(n) = token.parse::<usize>() {
        return if n <= 7 {
            Ok(n)
        } else {
            Err(format!("weekday {} out of range 0-7", n))
        };
    }
    WEEKDAYS
        .iter()
        .position(|name| name.eq_ignore_ascii_case(token))
        .ok_or_else(|| format!("unknown weekday '{}'", token))
}

/// Rewrite a standard cron weekday field as a list of day names.
///
/// The cron crate numbers days 1-7 from Sunday; names mean the same thing
/// in both conventions.
fn weekday_field(field: &str) -> Result<String, String> {
    if field == "*" || field == "?" {
        return Ok("*".to_string());
    }

    let mut days = [false; 7];
    for item in field.split(',') {
        let (range, step) = match item.split_once('/') {
            Some((range, step)) => {
                let step = step
                    .parse::<usize>()
                    .ok()
                    .filter(|s| *s > 0)
                    .ok_or_else(|| format!("bad weekday step '{}'", step))?;
                (range, Some(step))
            }
            None => (item, None),
        };
        let (start, end) = match range.split_once('-') {
            _ if range == "*" => (0, 6),
            Some((from, to)) => (weekday(from)?, weekday(to)?),
            None => {
                let day = weekday(range)?;
                (day, if step.is_some() { 7 } else { day })
            }
        };
        if start > end {
            return Err(format!("weekday range '{}' runs backwards", range));
        }
        for day in (start..=end).step_by(step.unwrap_or(1)) {
            days[day % 7] = true;
        }
    }

    Ok(WEEKDAYS
        .iter()
        .zip(days)
        .filter(|(_, on)| *on)
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(","))
}

/// Drives every enabled trigger until shutdown
pub struct Scheduler {
    runner: Arc<JobRunner>,
    entries: Vec<(Trigger, Arc<dyn BatchJob>)>,
}

impl Scheduler {
    pub fn new(runner: Arc<JobRunner>) -> Self {
        Self {
            runner,
            entries: Vec::new(),
        }
    }

    /// Register `job` to fire on `trigger`
    pub fn add(&mut self, trigger: Trigger, job: Arc<dyn BatchJob>) {
        self.entries.push((trigger, job));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run until `shutdown` turns true (or its sender is dropped). A run in
    /// progress is allowed to finish.
    pub async fn run(self, shutdown: watch::Receiver<bool>) {
        let mut loops = JoinSet::new();
        for (trigger, job) in self.entries {
            info!(
                job = %trigger.job,
                cron = %trigger.expression,
                timezone = %trigger.timezone,
                "Job scheduled"
            );
            loops.spawn(job_loop(trigger, job, Arc::clone(&self.runner), shutdown.clone()));
        }

        while let Some(result) = loops.join_next().await {
            if let Err(e) = result {
                warn!(error = %e, "Trigger loop ended abnormally");
            }
        }
        info!("Scheduler stopped");
    }
}

async fn job_loop(
    trigger: Trigger,
    job: Arc<dyn BatchJob>,
    runner: Arc<JobRunner>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        if *shutdown.borrow() {
            break;
        }

        let now = Utc::now();
        let Some(next) = trigger.next_after(now) else {
            warn!(job = %trigger.job, "No upcoming fire time, trigger retired");
            break;
        };
        let wait = (next - now).to_std().unwrap_or_default();
        debug!(
            job = %trigger.job,
            next = %next.with_timezone(&trigger.timezone),
            "Waiting for next trigger"
        );

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
        }

        runner.run(Arc::clone(&job), trigger.business_date(next)).await;
    }
}
