//! Loans and the loan lifecycle state machine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AccountId, LoanId, UserId};
use crate::types::error::DomainError;

/// Loan lifecycle status.
///
/// ```text
/// PENDING -> APPROVED | REJECTED
/// APPROVED -> DISBURSED -> ACTIVE
/// DISBURSED | ACTIVE -> ACTIVE | DEFAULTED | FULLY_PAID
/// ```
///
/// `DEFAULTED`, `FULLY_PAID` and `REJECTED` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    /// Requested, awaiting review
    Pending,
    /// Approved, not yet paid out
    Approved,
    /// Refused at review
    Rejected,
    /// Funds paid out
    Disbursed,
    /// Repaying on schedule
    Active,
    /// Fully repaid
    FullyPaid,
    /// Escalated after the default threshold
    Defaulted,
}

impl LoanStatus {
    /// Get the status name for display
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Disbursed => "DISBURSED",
            Self::Active => "ACTIVE",
            Self::FullyPaid => "FULLY_PAID",
            Self::Defaulted => "DEFAULTED",
        }
    }

    /// No transition leaves a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::FullyPaid | Self::Defaulted)
    }

    /// Whether the lifecycle allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: LoanStatus) -> bool {
        use LoanStatus::*;
        matches!(
            (self, next),
            (Pending, Approved)
                | (Pending, Rejected)
                | (Approved, Disbursed)
                | (Disbursed, Active)
                | (Disbursed, Defaulted)
                | (Disbursed, FullyPaid)
                | (Active, Active)
                | (Active, Defaulted)
                | (Active, FullyPaid)
        )
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credit review outcome, tracked separately from the lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    /// Not reviewed yet
    Pending,
    /// Approved by a reviewer
    Approved,
    /// Rejected by a reviewer
    Rejected,
}

/// A customer loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Loan ID
    pub id: LoanId,
    /// Customer-facing loan number
    pub loan_number: String,
    /// Borrower
    pub user_id: UserId,
    /// Amount lent
    pub principal_amount: Decimal,
    /// Principal plus scheduled interest
    pub total_amount: Decimal,
    /// Amount still owed, never negative
    pub outstanding_amount: Decimal,
    /// Lifecycle status
    pub status: LoanStatus,
    /// Review outcome
    pub approval_status: ApprovalStatus,
    /// When the loan was requested
    pub requested_at: DateTime<Utc>,
    /// When the loan was approved
    pub approved_at: Option<DateTime<Utc>>,
    /// When funds were paid out
    pub disbursed_at: Option<DateTime<Utc>>,
    /// Linked credit account
    pub credit_account_id: Option<u64>,
    /// Linked savings account
    pub savings_account_id: Option<AccountId>,
    /// Set when the loan is defaulted and cleared once the borrower's
    /// credit penalty has been applied
    #[serde(default)]
    pub credit_penalty_pending: bool,
    /// Row version for optimistic locking
    pub version: u64,
}

impl Loan {
    /// Apply a lifecycle transition, refusing anything the state machine forbids.
    pub fn transition_to(&mut self, next: LoanStatus) -> Result<LoanStatus, DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::transition("loan", self.status, next));
        }
        let previous = self.status;
        self.status = next;
        Ok(previous)
    }

    /// Whether the loan has already been escalated
    pub fn is_defaulted(&self) -> bool {
        self.status == LoanStatus::Defaulted
    }

    /// Move to DEFAULTED and record that the credit penalty is still owed.
    pub fn mark_defaulted(&mut self) -> Result<LoanStatus, DomainError> {
        let previous = self.transition_to(LoanStatus::Defaulted)?;
        self.credit_penalty_pending = true;
        Ok(previous)
    }

    /// Whether the default was recorded but its credit penalty not yet applied
    pub fn owes_credit_penalty(&self) -> bool {
        self.is_defaulted() && self.credit_penalty_pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn loan(status: LoanStatus) -> Loan {
        Loan {
            id: 7,
            loan_number: "LN-0007".to_string(),
            user_id: 3,
            principal_amount: dec!(100000),
            total_amount: dec!(110000),
            outstanding_amount: dec!(80000),
            status,
            approval_status: ApprovalStatus::Approved,
            requested_at: Utc::now(),
            approved_at: None,
            disbursed_at: None,
            credit_account_id: None,
            savings_account_id: None,
            credit_penalty_pending: false,
            version: 0,
        }
    }

    #[test]
    fn test_default_from_active_and_disbursed() {
        for status in [LoanStatus::Active, LoanStatus::Disbursed] {
            let mut l = loan(status);
            assert_eq!(l.transition_to(LoanStatus::Defaulted), Ok(status));
            assert!(l.is_defaulted());
        }
    }

    #[test]
    fn test_terminal_states_refuse_transitions() {
        for status in [LoanStatus::Defaulted, LoanStatus::FullyPaid, LoanStatus::Rejected] {
            assert!(status.is_terminal());
            let mut l = loan(status);
            for next in [LoanStatus::Active, LoanStatus::Defaulted, LoanStatus::Pending] {
                assert!(l.transition_to(next).is_err());
            }
            assert_eq!(l.status, status);
        }
    }

    #[test]
    fn test_mark_defaulted_owes_penalty_until_cleared() {
        let mut l = loan(LoanStatus::Active);
        assert!(!l.owes_credit_penalty());

        assert_eq!(l.mark_defaulted(), Ok(LoanStatus::Active));
        assert!(l.owes_credit_penalty());

        l.credit_penalty_pending = false;
        assert!(!l.owes_credit_penalty());
        assert!(l.mark_defaulted().is_err());
        assert!(!l.credit_penalty_pending);
    }

    #[test]
    fn test_lifecycle_is_monotonic() {
        assert!(!LoanStatus::Active.can_transition_to(LoanStatus::Pending));
        assert!(!LoanStatus::Disbursed.can_transition_to(LoanStatus::Approved));
        assert!(!LoanStatus::Pending.can_transition_to(LoanStatus::Defaulted));
    }
}
