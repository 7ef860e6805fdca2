//! Ledger transactions recorded by the batch.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AccountId, TransactionId, UserId};

/// Kind of money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Monthly interest compounded into a savings balance
    InterestCredit,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InterestCredit => "INTEREST_CREDIT",
        };
        f.write_str(name)
    }
}

/// Settlement state of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Created, not yet settled
    Pending,
    /// Settled
    Completed,
}

/// A ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID
    pub id: TransactionId,
    /// Customer
    pub user_id: UserId,
    /// Account the money moved on
    pub account_id: AccountId,
    /// Movement kind
    pub kind: TransactionType,
    /// Amount, always positive
    pub amount: Decimal,
    /// Free-text description shown on statements
    pub description: String,
    /// Settlement state
    pub status: TransactionStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Settlement time
    pub completed_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Whether the transaction still awaits settlement
    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }
}
