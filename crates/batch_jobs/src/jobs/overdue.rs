//! Overdue detection for scheduled repayments.

use adapter_notify::template::PaymentOverdue;
use adapter_notify::Notification;
use async_trait::async_trait;
use batch_core::domain::Repayment;
use batch_core::types::time::Date;
use tracing::info;

use crate::error::JobError;
use crate::job::{BatchJob, JobContext, JobName};
use crate::report::{EntityOutcome, JobReport};

/// Moves every SCHEDULED repayment whose due date has passed to OVERDUE.
///
/// No fee is charged here; that is the late-fee job's concern.
pub struct LoanOverdueJob {
    ctx: JobContext,
}

impl LoanOverdueJob {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx }
    }

    async fn process(&self, mut repayment: Repayment) -> Result<EntityOutcome, JobError> {
        repayment.mark_overdue()?;
        let saved = self.ctx.gateways.repayments.save_repayment(&repayment).await?;
        info!(
            repayment_id = saved.id,
            loan_id = saved.loan_id,
            due_date = %saved.due_date,
            "Repayment marked overdue"
        );

        let sent = self
            .ctx
            .notify_borrower(saved.loan_id, |loan, user| {
                Notification::PaymentOverdue(PaymentOverdue {
                    customer_name: user.name.clone(),
                    loan_number: loan.loan_number.clone(),
                    schedule_number: saved.schedule_number,
                    due_date: saved.due_date,
                    due_amount: saved.due_amount,
                    days_overdue: 0,
                    outstanding_amount: loan.outstanding_amount,
                })
            })
            .await;
        Ok(EntityOutcome::notified(sent))
    }
}

#[async_trait]
impl BatchJob for LoanOverdueJob {
    fn name(&self) -> JobName {
        JobName::LoanOverdueCheck
    }

    async fn run(&self, today: Date) -> Result<JobReport, JobError> {
        let repayments = self
            .ctx
            .gateways
            .repayments
            .find_overdue_repayments(today)
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
