//! Repayment schedule entries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{LoanId, RepaymentId};
use crate::types::error::DomainError;
use crate::types::money::round_currency;
use crate::types::time::Date;

/// Repayment status: `SCHEDULED -> OVERDUE -> PAID`, with `PAID` also
/// reachable straight from `SCHEDULED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepaymentStatus {
    /// Not yet due
    Scheduled,
    /// Due date has passed without payment
    Overdue,
    /// Settled
    Paid,
}

impl RepaymentStatus {
    /// Get the status name for display
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Overdue => "OVERDUE",
            Self::Paid => "PAID",
        }
    }
}

impl fmt::Display for RepaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One installment of a loan's repayment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repayment {
    /// Repayment ID
    pub id: RepaymentId,
    /// Loan the installment belongs to
    pub loan_id: LoanId,
    /// 1-based installment number
    pub schedule_number: u32,
    /// Due date
    pub due_date: Date,
    /// Installment amount
    pub due_amount: Decimal,
    /// Late fee charged so far
    pub late_fee: Decimal,
    /// Status
    pub status: RepaymentStatus,
    /// Settlement date
    pub paid_on: Option<Date>,
    /// Row version for optimistic locking
    pub version: u64,
}

impl Repayment {
    /// Whole days past the due date as of `today` (negative before it).
    pub fn days_overdue(&self, today: Date) -> i64 {
        today - self.due_date
    }

    /// Installment plus any late fee
    pub fn total_due(&self) -> Decimal {
        self.due_amount + self.late_fee
    }

    /// `SCHEDULED -> OVERDUE`
    pub fn mark_overdue(&mut self) -> Result<(), DomainError> {
        match self.status {
            RepaymentStatus::Scheduled => {
                self.status = RepaymentStatus::Overdue;
                Ok(())
            }
            other => Err(DomainError::transition(
                "repayment",
                other,
                RepaymentStatus::Overdue,
            )),
        }
    }

    /// Records a late fee on an overdue installment.
    ///
    /// The fee replaces the previous value rather than adding to it, so the
    /// same fee applied twice leaves the installment unchanged. A fee lower
    /// than the one already recorded is ignored. Returns whether the stored
    /// fee changed.
    pub fn apply_late_fee(&mut self, fee: Decimal) -> Result<bool, DomainError> {
        if self.status != RepaymentStatus::Overdue {
            return Err(DomainError::transition("repayment", self.status, "LATE_FEE"));
        }
        if fee < Decimal::ZERO {
            return Err(DomainError::NegativeAmount {
                field: "late_fee",
                value: fee.to_string(),
            });
        }
        let fee = round_currency(fee);
        if fee <= self.late_fee {
            return Ok(false);
        }
        self.late_fee = fee;
        Ok(true)
    }

    /// `SCHEDULED | OVERDUE -> PAID`
    pub fn mark_paid(&mut self, on: Date) -> Result<(), DomainError> {
        if self.status == RepaymentStatus::Paid {
            return Err(DomainError::transition(
                "repayment",
                self.status,
                RepaymentStatus::Paid,
            ));
        }
        self.status = RepaymentStatus::Paid;
        self.paid_on = Some(on);
        Ok(())
    }
}
