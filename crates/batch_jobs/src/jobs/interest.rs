//! Daily interest accrual and month-end compounding.

use adapter_notify::template::InterestCredited;
use adapter_notify::Notification;
use async_trait::async_trait;
use batch_core::calculators::interest::daily_interest;
use batch_core::domain::{DailyBalanceSnapshot, SavingsAccount, Transaction, TransactionType};
use batch_core::types::time::Date;
use infra_store::StoreError;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::JobError;
use crate::job::{BatchJob, JobContext, JobName};
use crate::report::{EntityOutcome, JobReport};

/// Accrues one day of interest on every active account, compounds at month
/// end and records the day's balance snapshot.
///
/// A month-end credit is written to the ledger as PENDING before the account
/// is saved and completed afterwards. When a run fails part-way through an
/// account, the next run on the same business date finishes whatever is
/// missing (snapshot, credit settlement, notification) instead of skipping.
pub struct SavingsInterestJob {
    ctx: JobContext,
}

fn credit_description(today: Date) -> String {
    format!("Interest for {}", today.month_label())
}

impl SavingsInterestJob {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx }
    }

    async fn process(&self, mut account: SavingsAccount, today: Date) -> Result<EntityOutcome, JobError> {
        if account.accrued_on(today) {
            return self.resume(account, today).await;
        }

        let interest = daily_interest(account.balance, account.annual_rate);
        account.accrue(interest, today)?;

        let credited = if today.is_last_day_of_month() {
            account.compound(today)
        } else {
            None
        };
        let pending = match credited {
            Some(amount) => Some(self.open_credit(&account, amount, today).await?),
            None => None,
        };

        let saved = self.ctx.gateways.accounts.save_savings_account(&account).await?;
        self.record_snapshot(&saved, today).await?;

        match pending {
            Some(credit) => self.settle_credit(&saved, credit, today).await,
            None => Ok(EntityOutcome::done()),
        }
    }

    /// Finish an account whose accrual for `today` is already saved
    async fn resume(&self, account: SavingsAccount, today: Date) -> Result<EntityOutcome, JobError> {
        let wrote_snapshot = self.record_snapshot(&account, today).await?;
        let pending = if account.last_interest_calculation_date == Some(today) {
            self.pending_credit(&account, today).await?
        } else {
            None
        };

        match pending {
            Some(credit) => {
                info!(
                    account_id = account.id,
                    transaction_id = credit.id,
                    "Completing interrupted interest credit"
                );
                self.settle_credit(&account, credit, today).await
            }
            None if wrote_snapshot => Ok(EntityOutcome::done()),
            None => {
                debug!(account_id = account.id, %today, "Interest already accrued today");
                Ok(EntityOutcome::Skipped)
            }
        }
    }

    /// Append today's snapshot; `false` when it already exists
    async fn record_snapshot(&self, account: &SavingsAccount, today: Date) -> Result<bool, JobError> {
        match self
            .ctx
            .gateways
            .snapshots
            .append_snapshot(DailyBalanceSnapshot::capture(account, today))
            .await
        {
            Ok(()) => Ok(true),
            Err(StoreError::Duplicate { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Latest PENDING credit for this month, if an earlier attempt left one
    async fn pending_credit(&self, account: &SavingsAccount, today: Date) -> Result<Option<Transaction>, JobError> {
        let description = credit_description(today);
        Ok(self
            .ctx
            .gateways
            .ledger
            .find_transactions(account.id)
            .await?
            .into_iter()
            .rev()
            .find(|t| {
                t.kind == TransactionType::InterestCredit
                    && t.is_pending()
                    && t.description == description
            }))
    }

    /// PENDING ledger entry for a credit about to be saved, reusing one left
    /// by a failed save of the same amount
    async fn open_credit(&self, account: &SavingsAccount, amount: Decimal, today: Date) -> Result<Transaction, JobError> {
        if let Some(credit) = self.pending_credit(account, today).await? {
            if credit.amount == amount {
                return Ok(credit);
            }
        }
        Ok(self
            .ctx
            .gateways
            .ledger
            .create_transaction(
                account.user_id,
                account.id,
                TransactionType::InterestCredit,
                amount,
                credit_description(today),
            )
            .await?)
    }

    async fn settle_credit(
        &self,
        account: &SavingsAccount,
        credit: Transaction,
        today: Date,
    ) -> Result<EntityOutcome, JobError> {
        let credit = self.ctx.gateways.ledger.complete_transaction(credit.id).await?;
        let amount = credit.amount;
        let old_balance = account.balance - amount;

        info!(
            account_id = account.id,
            amount = %amount,
            new_balance = %account.balance,
            transaction_id = credit.id,
            "Interest compounded"
        );

        let sent = self
            .ctx
            .notify_user(account.user_id, |user| {
                Notification::InterestCredited(InterestCredited {
                    customer_name: user.name.clone(),
                    account_number: account.account_number.clone(),
                    old_balance,
                    new_balance: account.balance,
                    interest_amount: amount,
                    annual_rate: account.annual_rate,
                    tier: account.tier,
                    month: today.month_label(),
                })
            })
            .await;
        Ok(EntityOutcome::notified(sent))
    }
}

#[async_trait]
impl BatchJob for SavingsInterestJob {
    fn name(&self) -> JobName {
        JobName::InterestAccrual
    }

    async fn run(&self, today: Date) -> Result<JobReport, JobError> {
        let accounts = self
            .ctx
            .gateways
            .accounts
            .find_active_savings_accounts()
            .await
            .map_err(JobError::Query)?;

        Ok(self
            .ctx
            .process_all(self.name(), "account", accounts, |a| a.id, |a| {
                self.process(a, today)
            })
            .await)
    }
}
