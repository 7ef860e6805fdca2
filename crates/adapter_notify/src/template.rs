//! Notification templates and their payloads.

use batch_core::calculators::tier::TierBenefits;
use batch_core::domain::AccountTier;
use batch_core::types::time::Date;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::error::NotifyError;

/// Templates known to the rendering subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    /// Monthly interest compounded into a savings balance
    InterestCredited,
    /// A repayment just became overdue
    PaymentOverdue,
    /// A late fee was charged
    LateFeeApplied,
    /// A loan was escalated to default
    LoanDefaulted,
    /// A savings account moved up a tier
    TierUpgrade,
    /// A repayment falls due soon
    RepaymentDue,
}

impl Template {
    /// Template id used by the rendering subsystem
    pub fn id(&self) -> &'static str {
        match self {
            Self::InterestCredited => "interest-credited",
            Self::PaymentOverdue => "payment-overdue",
            Self::LateFeeApplied => "late-fee-applied",
            Self::LoanDefaulted => "loan-defaulted",
            Self::TierUpgrade => "tier-upgrade",
            Self::RepaymentDue => "repayment-due",
        }
    }

    /// Email subject line
    pub fn subject(&self) -> &'static str {
        match self {
            Self::InterestCredited => "Your monthly interest has been credited",
            Self::PaymentOverdue => "Your loan payment is overdue",
            Self::LateFeeApplied => "A late fee has been applied to your loan",
            Self::LoanDefaulted => "Your loan is in default",
            Self::TierUpgrade => "Your savings account has been upgraded",
            Self::RepaymentDue => "Upcoming loan repayment",
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Interest compounded at month end
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterestCredited {
    pub customer_name: String,
    pub account_number: String,
    pub old_balance: Decimal,
    pub new_balance: Decimal,
    pub interest_amount: Decimal,
    pub annual_rate: Decimal,
    pub tier: AccountTier,
    /// e.g. "October 2026"
    pub month: String,
}

/// Repayment moved to OVERDUE
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentOverdue {
    pub customer_name: String,
    pub loan_number: String,
    pub schedule_number: u32,
    pub due_date: Date,
    pub due_amount: Decimal,
    pub days_overdue: i64,
    pub outstanding_amount: Decimal,
}

/// Late fee charged on an overdue repayment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LateFeeApplied {
    pub customer_name: String,
    pub loan_number: String,
    pub schedule_number: u32,
    pub due_date: Date,
    pub days_overdue: i64,
    pub due_amount: Decimal,
    pub late_fee: Decimal,
    pub total_due: Decimal,
}

/// Loan escalated to DEFAULTED
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanDefaulted {
    pub customer_name: String,
    pub loan_number: String,
    /// Always the default threshold, not the observed day count
    pub days_overdue: i64,
    pub outstanding_amount: Decimal,
    pub credit_score: Option<u32>,
}

/// Savings tier upgrade
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierUpgraded {
    pub customer_name: String,
    pub account_number: String,
    pub old_tier: AccountTier,
    pub new_tier: AccountTier,
    pub old_benefits: TierBenefits,
    pub new_benefits: TierBenefits,
}

/// Reminder ahead of a due date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepaymentDue {
    pub customer_name: String,
    pub loan_number: String,
    pub schedule_number: u32,
    pub due_date: Date,
    pub due_amount: Decimal,
    pub days_until_due: i64,
}

/// A notification ready to dispatch: template plus typed payload
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    InterestCredited(InterestCredited),
    PaymentOverdue(PaymentOverdue),
    LateFeeApplied(LateFeeApplied),
    LoanDefaulted(LoanDefaulted),
    TierUpgraded(TierUpgraded),
    RepaymentDue(RepaymentDue),
}

impl Notification {
    /// Template this notification renders with
    pub fn template(&self) -> Template {
        match self {
            Self::InterestCredited(_) => Template::InterestCredited,
            Self::PaymentOverdue(_) => Template::PaymentOverdue,
            Self::LateFeeApplied(_) => Template::LateFeeApplied,
            Self::LoanDefaulted(_) => Template::LoanDefaulted,
            Self::TierUpgraded(_) => Template::TierUpgrade,
            Self::RepaymentDue(_) => Template::RepaymentDue,
        }
    }

    /// Structured template data
    pub fn data(&self) -> Result<serde_json::Value, NotifyError> {
        let value = match self {
            Self::InterestCredited(d) => serde_json::to_value(d)?,
            Self::PaymentOverdue(d) => serde_json::to_value(d)?,
            Self::LateFeeApplied(d) => serde_json::to_value(d)?,
            Self::LoanDefaulted(d) => serde_json::to_value(d)?,
            Self::TierUpgraded(d) => serde_json::to_value(d)?,
            Self::RepaymentDue(d) => serde_json::to_value(d)?,
        };
        Ok(value)
    }
}
