//! Upcoming repayment reminders.

use adapter_notify::template::RepaymentDue;
use adapter_notify::Notification;
use async_trait::async_trait;
use batch_core::domain::Repayment;
use batch_core::types::time::Date;

use crate::error::JobError;
use crate::job::{BatchJob, JobContext, JobName};
use crate::report::{EntityOutcome, JobReport};

/// Reminds borrowers of SCHEDULED repayments due exactly `days_ahead` days
/// from today. Read-only.
pub struct RepaymentReminderJob {
    ctx: JobContext,
    days_ahead: i64,
}

impl RepaymentReminderJob {
    pub fn new(ctx: JobContext, days_ahead: i64) -> Self {
        Self { ctx, days_ahead }
    }

    async fn process(&self, repayment: Repayment) -> Result<EntityOutcome, JobError> {
        let days_until_due = self.days_ahead;
        let sent = self
            .ctx
            .notify_borrower(repayment.loan_id, |loan, user| {
                Notification::RepaymentDue(RepaymentDue {
                    customer_name: user.name.clone(),
                    loan_number: loan.loan_number.clone(),
                    schedule_number: repayment.schedule_number,
                    due_date: repayment.due_date,
                    due_amount: repayment.due_amount,
                    days_until_due,
                })
            })
            .await;
        Ok(EntityOutcome::notified(sent))
    }
}

#[async_trait]
impl BatchJob for RepaymentReminderJob {
    fn name(&self) -> JobName {
        JobName::RepaymentReminder
    }

    async fn run(&self, today: Date) -> Result<JobReport, JobError> {
        let due_on = today.add_days(self.days_ahead);
        let repayments = self
            .ctx
            .gateways
            .repayments
            .find_repayments_due_on(due_on)
            .await
            .map_err(JobError::Query)?;

        Ok(self
            .ctx
            .process_all(self.name(), "repayment", repayments, |r| r.id, |r| {
                self.process(r)
            })
            .await)
    }
}
