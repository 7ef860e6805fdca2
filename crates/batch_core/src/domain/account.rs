//! Savings accounts and their daily balance snapshots.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AccountId, UserId};
use crate::types::error::DomainError;
use crate::types::money::round_currency;
use crate::types::time::Date;

/// Savings account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    /// Accrues interest and is evaluated for tiers
    Active,
    /// Frozen by operations; ignored by the batch
    Suspended,
    /// Closed by the customer; ignored by the batch
    Closed,
}

impl AccountStatus {
    /// Get the status name for display
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Savings account tier, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountTier {
    /// Entry tier
    #[default]
    Basic,
    /// Silver tier
    Silver,
    /// Gold tier
    Gold,
    /// Platinum tier
    Platinum,
}

impl AccountTier {
    /// All tiers, lowest first
    pub const ALL: [AccountTier; 4] = [Self::Basic, Self::Silver, Self::Gold, Self::Platinum];

    /// Get the tier name for display
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Silver => "SILVER",
            Self::Gold => "GOLD",
            Self::Platinum => "PLATINUM",
        }
    }
}

impl fmt::Display for AccountTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer savings account.
///
/// `balance` is never negative and `accrued_interest` is never negative;
/// accrued interest drops to zero only when it is compounded into the
/// balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsAccount {
    /// Account ID
    pub id: AccountId,
    /// Customer-facing account number
    pub account_number: String,
    /// Owning user
    pub user_id: UserId,
    /// Current balance
    pub balance: Decimal,
    /// Interest earned but not yet compounded
    pub accrued_interest: Decimal,
    /// Annual interest rate in percent (5.0 means 5%)
    pub annual_rate: Decimal,
    /// Current tier
    pub tier: AccountTier,
    /// Account status
    pub status: AccountStatus,
    /// Date the account was opened
    pub opened_on: Date,
    /// Last date accrued interest was compounded into the balance
    pub last_interest_calculation_date: Option<Date>,
    /// Last date a daily accrual was applied
    pub last_accrual_date: Option<Date>,
    /// Row version for optimistic locking
    pub version: u64,
}

impl SavingsAccount {
    /// Whether the account takes part in the batch
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Whether today's accrual has already been applied
    pub fn accrued_on(&self, date: Date) -> bool {
        self.last_accrual_date == Some(date)
    }

    /// Adds one day's interest to the accrued amount.
    ///
    /// Negative interest is refused so accrued interest stays non-negative.
    pub fn accrue(&mut self, interest: Decimal, on: Date) -> Result<(), DomainError> {
        if interest < Decimal::ZERO {
            return Err(DomainError::NegativeAmount {
                field: "daily_interest",
                value: interest.to_string(),
            });
        }
        self.accrued_interest = round_currency(self.accrued_interest + interest);
        self.last_accrual_date = Some(on);
        Ok(())
    }

    /// Moves accrued interest into the balance.
    ///
    /// Returns the credited amount, or `None` when nothing had accrued.
    pub fn compound(&mut self, on: Date) -> Option<Decimal> {
        if self.accrued_interest <= Decimal::ZERO {
            return None;
        }
        let credited = self.accrued_interest;
        self.balance = round_currency(self.balance + credited);
        self.accrued_interest = Decimal::ZERO;
        self.last_interest_calculation_date = Some(on);
        Some(credited)
    }

    /// Moves the account to a strictly higher tier, returning the old one.
    pub fn upgrade_tier(&mut self, tier: AccountTier) -> Result<AccountTier, DomainError> {
        if tier <= self.tier {
            return Err(DomainError::NotAnUpgrade {
                from: self.tier.to_string(),
                to: tier.to_string(),
            });
        }
        let previous = self.tier;
        self.tier = tier;
        Ok(previous)
    }
}

/// Immutable end-of-day balance record, one per account per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBalanceSnapshot {
    /// Account the snapshot belongs to
    pub account_id: AccountId,
    /// Balance at the time of the snapshot
    pub balance: Decimal,
    /// Business date of the snapshot
    pub snapshot_date: Date,
}

impl DailyBalanceSnapshot {
    /// Capture the account's current balance for `date`
    pub fn capture(account: &SavingsAccount, date: Date) -> Self {
        Self {
            account_id: account.id,
            balance: round_currency(account.balance),
            snapshot_date: date,
        }
    }
}
