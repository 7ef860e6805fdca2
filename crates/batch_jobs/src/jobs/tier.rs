//! Monthly savings tier re-evaluation.

use adapter_notify::template::TierUpgraded;
use adapter_notify::Notification;
use async_trait::async_trait;
use batch_core::calculators::tier::evaluate_upgrade;
use batch_core::domain::SavingsAccount;
use batch_core::types::time::Date;
use tracing::info;

use crate::error::JobError;
use crate::job::{BatchJob, JobContext, JobName};
use crate::report::{EntityOutcome, JobReport};

/// Moves active accounts up to the highest tier their balance and age
/// qualify for. Tiers never go down.
pub struct TierUpgradeJob {
    ctx: JobContext,
}

impl TierUpgradeJob {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx }
    }

    async fn process(&self, mut account: SavingsAccount, today: Date) -> Result<EntityOutcome, JobError> {
        let age_months = today.months_since(account.opened_on);
        let Some(target) = evaluate_upgrade(account.tier, account.balance, age_months) else {
            return Ok(EntityOutcome::Skipped);
        };

        let previous = account.upgrade_tier(target)?;
        let saved = self.ctx.gateways.accounts.save_savings_account(&account).await?;
        info!(
            account_id = saved.id,
            from = %previous,
            to = %saved.tier,
            balance = %saved.balance,
            age_months,
            "Tier upgraded"
        );

        let sent = self
            .ctx
            .notify_user(saved.user_id, |user| {
                Notification::TierUpgraded(TierUpgraded {
                    customer_name: user.name.clone(),
                    account_number: saved.account_number.clone(),
                    old_tier: previous,
                    new_tier: saved.tier,
                    old_benefits: previous.benefits(),
                    new_benefits: saved.tier.benefits(),
                })
            })
            .await;
        Ok(EntityOutcome::notified(sent))
    }
}

#[async_trait]
impl BatchJob for TierUpgradeJob {
    fn name(&self) -> JobName {
        JobName::TierUpgradeEvaluation
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
