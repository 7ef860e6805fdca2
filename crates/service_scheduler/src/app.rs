//! Composition root.
//!
//! Everything is wired once here: gateways, business-rule policies and the
//! notification sender go in, a job table, a runner and a scheduler come
//! out.

use adapter_notify::{NotificationDispatcher, NotificationSender};
use batch_core::types::time::Date;
use batch_jobs::jobs::{
    LateFeeJob, LoanDefaultJob, LoanOverdueJob, RepaymentReminderJob, SavingsInterestJob,
    TierUpgradeJob,
};
use batch_jobs::{BatchJob, JobContext, JobError, JobName};
use chrono_tz::Tz;
use infra_config::BatchConfig;
use infra_store::Gateways;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::error::SchedulerError;
use crate::runner::{JobRunner, RunRecord};
use crate::scheduler::{Scheduler, Trigger};

/// The assembled batch engine
pub struct App {
    jobs: BTreeMap<JobName, Arc<dyn BatchJob>>,
    triggers: Vec<Trigger>,
    runner: Arc<JobRunner>,
    notifier: Arc<NotificationDispatcher>,
    timezone: Tz,
}

impl App {
    /// Wire the six jobs and their triggers from `config`
    pub fn build(
        config: &BatchConfig,
        gateways: Gateways,
        sender: Arc<dyn NotificationSender>,
    ) -> Result<Self, SchedulerError> {
        config.validate()?;
        let timezone = config.tz()?;

        let notifier = Arc::new(NotificationDispatcher::new(sender));
        let ctx = JobContext::new(gateways, Arc::clone(&notifier))
            .with_max_concurrency(config.runner.max_concurrency);
        let rules = &config.rules;

        let all: [Arc<dyn BatchJob>; 6] = [
            Arc::new(SavingsInterestJob::new(ctx.clone())),
            Arc::new(LoanOverdueJob::new(ctx.clone())),
            Arc::new(LateFeeJob::new(ctx.clone(), rules.late_fee.clone())),
            Arc::new(LoanDefaultJob::new(ctx.clone(), rules.delinquency.clone())),
            Arc::new(TierUpgradeJob::new(ctx.clone())),
            Arc::new(RepaymentReminderJob::new(ctx, rules.reminder_days_ahead)),
        ];
        let jobs: BTreeMap<JobName, Arc<dyn BatchJob>> =
            all.into_iter().map(|job| (job.name(), job)).collect();

        let mut triggers = Vec::new();
        for name in JobName::ALL {
            let schedule = config
                .schedule_for(name.as_str())
                .ok_or_else(|| JobError::UnknownJob(name.to_string()))?;
            if !schedule.enabled {
                info!(job = %name, "Job disabled in configuration");
                continue;
            }
            triggers.push(Trigger::parse(name, &schedule.cron, &schedule.timezone)?);
        }

        let runner = Arc::new(JobRunner::new(Duration::from_secs(config.runner.max_run_secs)));

        Ok(Self {
            jobs,
            triggers,
            runner,
            notifier,
            timezone,
        })
    }

    /// Job service by name
    pub fn job(&self, name: JobName) -> Option<Arc<dyn BatchJob>> {
        self.jobs.get(&name).cloned()
    }

    /// Enabled triggers in daily order
    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    pub fn runner(&self) -> Arc<JobRunner> {
        Arc::clone(&self.runner)
    }

    pub fn notifier(&self) -> Arc<NotificationDispatcher> {
        Arc::clone(&self.notifier)
    }

    /// Today in the configured timezone
    pub fn today(&self) -> Date {
        Date::today_in(self.timezone)
    }

    /// Run one job immediately for `business_date`, outside the schedule
    pub async fn run_job(&self, name: JobName, business_date: Date) -> Result<RunRecord, SchedulerError> {
        let job = self
            .job(name)
            .ok_or_else(|| JobError::UnknownJob(name.to_string()))?;
        Ok(self.runner.run(job, business_date).await)
    }

    /// Scheduler over every enabled trigger
    pub fn scheduler(&self) -> Scheduler {
        let mut scheduler = Scheduler::new(self.runner());
        for trigger in &self.triggers {
            if let Some(job) = self.job(trigger.job()) {
                scheduler.add(trigger.clone(), job);
            }
        }
        scheduler
    }
}
