//! Loan default escalation.

use adapter_notify::template::LoanDefaulted;
use adapter_notify::Notification;
use async_trait::async_trait;
use batch_core::calculators::delinquency::DelinquencyPolicy;
use batch_core::domain::{Loan, LoanId, LoanStatus, Repayment, RepaymentStatus};
use batch_core::types::time::Date;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::error::JobError;
use crate::job::{BatchJob, JobContext, JobName};
use crate::report::{EntityOutcome, JobReport};

/// Puts loans into DEFAULTED once their worst overdue installment reaches
/// the default threshold, and lowers the borrower's credit score.
///
/// Loans are always processed one at a time: two loans may share a
/// borrower, and the score penalty is a read-modify-write on that user.
///
/// The loan is saved as DEFAULTED with `credit_penalty_pending` set before
/// the borrower is touched; if the penalty cannot be applied the next run
/// picks the loan up again and finishes it.
pub struct LoanDefaultJob {
    ctx: JobContext,
    policy: DelinquencyPolicy,
}

/// A loan and the largest days-overdue seen among its installments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Delinquency {
    loan_id: LoanId,
    max_days_overdue: i64,
}

/// Group installments by loan in first-seen order, keeping the maximum
fn worst_per_loan(repayments: &[Repayment], today: Date) -> Vec<Delinquency> {
    let mut order = Vec::new();
    let mut worst: HashMap<LoanId, i64> = HashMap::new();
    for repayment in repayments {
        let days = repayment.days_overdue(today);
        worst
            .entry(repayment.loan_id)
            .and_modify(|max| *max = (*max).max(days))
            .or_insert_with(|| {
                order.push(repayment.loan_id);
                days
            });
    }
    order
        .into_iter()
        .map(|loan_id| Delinquency {
            loan_id,
            max_days_overdue: worst[&loan_id],
        })
        .collect()
}

impl LoanDefaultJob {
    pub fn new(ctx: JobContext, policy: DelinquencyPolicy) -> Self {
        Self {
            ctx: ctx.with_max_concurrency(1),
            policy,
        }
    }

    async fn process(&self, candidate: Delinquency) -> Result<EntityOutcome, JobError> {
        let mut loan = self.ctx.require_loan(candidate.loan_id).await?;
        if loan.owes_credit_penalty() {
            info!(loan_id = loan.id, "Completing interrupted default");
        } else if loan.status.can_transition_to(LoanStatus::Defaulted) {
            loan.mark_defaulted()?;
            loan = self.ctx.gateways.loans.save_loan(&loan).await?;
            info!(
                loan_id = loan.id,
                loan_number = %loan.loan_number,
                max_days_overdue = candidate.max_days_overdue,
                "Loan defaulted"
            );
        } else {
            debug!(loan_id = loan.id, status = %loan.status, "Loan not eligible for default");
            return Ok(EntityOutcome::Skipped);
        }

        let credit_score = self.penalise_borrower(&loan).await?;
        loan.credit_penalty_pending = false;
        let loan = self.ctx.gateways.loans.save_loan(&loan).await?;

        let threshold = self.policy.default_threshold_days;
        let sent = self
            .ctx
            .notify_user(loan.user_id, |user| {
                Notification::LoanDefaulted(LoanDefaulted {
                    customer_name: user.name.clone(),
                    loan_number: loan.loan_number.clone(),
                    days_overdue: threshold,
                    outstanding_amount: loan.outstanding_amount,
                    credit_score,
                })
            })
            .await;
        Ok(EntityOutcome::notified(sent))
    }

    /// Apply the score penalty to the loan's borrower, returning the new score
    async fn penalise_borrower(&self, loan: &Loan) -> Result<Option<u32>, JobError> {
        let Some(mut user) = self.ctx.gateways.users.find_user(loan.user_id).await? else {
            warn!(user_id = loan.user_id, loan_id = loan.id, "Borrower not found");
            return Ok(None);
        };
        let Some((old, new)) = user.apply_credit_penalty(self.policy.credit_score_penalty) else {
            return Ok(None);
        };
        let user = self.ctx.gateways.users.save_user(&user).await?;
        info!(user_id = user.id, old, new, "Credit score penalised");
        Ok(Some(new))
    }
}

#[async_trait]
impl BatchJob for LoanDefaultJob {
    fn name(&self) -> JobName {
        JobName::LoanDefaulting
    }

    async fn run(&self, today: Date) -> Result<JobReport, JobError> {
        let repayments = self
            .ctx
            .gateways
            .repayments
            .find_repayments_by_status(RepaymentStatus::Overdue)
            .await
            .map_err(JobError::Query)?;

        let candidates: Vec<Delinquency> = worst_per_loan(&repayments, today)
            .into_iter()
            .filter(|d| self.policy.is_default(d.max_days_overdue))
            .collect();

        Ok(self
            .ctx
            .process_all(self.name(), "loan", candidates, |d| d.loan_id, |d| {
                self.process(d)
            })
            .await)
    }
}
