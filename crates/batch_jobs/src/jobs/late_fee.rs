//! Late fee assessment on overdue repayments.

use adapter_notify::template::LateFeeApplied;
use adapter_notify::Notification;
use async_trait::async_trait;
use batch_core::calculators::late_fee::LateFeePolicy;
use batch_core::domain::{Repayment, RepaymentStatus};
use batch_core::types::time::Date;
use tracing::{debug, info};

use crate::error::JobError;
use crate::job::{BatchJob, JobContext, JobName};
use crate::report::{EntityOutcome, JobReport};

/// Charges the policy fee on every OVERDUE repayment inside the fee window.
///
/// The fee replaces any earlier one instead of accumulating, and a fee that
/// would not raise the recorded amount leaves the repayment untouched, so
/// re-running on the same day neither writes nor notifies again.
pub struct LateFeeJob {
    ctx: JobContext,
    policy: LateFeePolicy,
}

impl LateFeeJob {
    pub fn new(ctx: JobContext, policy: LateFeePolicy) -> Self {
        Self { ctx, policy }
    }

    async fn process(&self, mut repayment: Repayment, today: Date) -> Result<EntityOutcome, JobError> {
        let days_overdue = repayment.days_overdue(today);
        if !self.policy.in_fee_window(days_overdue) {
            return Ok(EntityOutcome::Skipped);
        }

        let loan = self.ctx.require_loan(repayment.loan_id).await?;
        let fee = self
            .policy
            .late_fee(days_overdue, repayment.due_amount, loan.principal_amount);
        if fee.is_zero() || !repayment.apply_late_fee(fee)? {
            debug!(repayment_id = repayment.id, %fee, "Late fee unchanged");
            return Ok(EntityOutcome::Skipped);
        }

        let saved = self.ctx.gateways.repayments.save_repayment(&repayment).await?;
        info!(
            repayment_id = saved.id,
            loan_id = loan.id,
            days_overdue,
            late_fee = %saved.late_fee,
            "Late fee applied"
        );

        let sent = self
            .ctx
            .notify_user(loan.user_id, |user| {
                Notification::LateFeeApplied(LateFeeApplied {
                    customer_name: user.name.clone(),
                    loan_number: loan.loan_number.clone(),
                    schedule_number: saved.schedule_number,
                    due_date: saved.due_date,
                    days_overdue,
                    due_amount: saved.due_amount,
                    late_fee: saved.late_fee,
                    total_due: saved.total_due(),
                })
            })
            .await;
        Ok(EntityOutcome::notified(sent))
    }
}

#[async_trait]
impl BatchJob for LateFeeJob {
    fn name(&self) -> JobName {
        JobName::LateFeeApplication
    }

    async fn run(&self, today: Date) -> Result<JobReport, JobError> {
        let repayments = self
            .ctx
            .gateways
            .repayments
            .find_repayments_by_status(RepaymentStatus::Overdue)
            .await
            .map_err(JobError::Query)?;

        Ok(self
            .ctx
            .process_all(self.name(), "repayment", repayments, |r| r.id, |r| {
                self.process(r, today)
            })
            .await)
    }
}
