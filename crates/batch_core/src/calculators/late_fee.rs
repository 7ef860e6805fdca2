//! Late fee schedule for overdue repayments.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::types::money::round_currency;

/// Late fee rules.
///
/// No fee inside the grace period, and none from `cutoff_days` on, where the
/// loan is escalated to default instead. In between the fee is the larger of
/// `minimum_fee` and `due_amount_rate` of the installment, capped at
/// `principal_cap_rate` of the loan principal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LateFeePolicy {
    /// Days after the due date with no fee
    pub grace_period_days: i64,
    /// First day count at which no fee is charged any more
    pub cutoff_days: i64,
    /// Fixed minimum fee
    pub minimum_fee: Decimal,
    /// Fraction of the installment charged as a fee
    pub due_amount_rate: Decimal,
    /// Fraction of the principal the fee may not exceed
    pub principal_cap_rate: Decimal,
}

impl Default for LateFeePolicy {
    fn default() -> Self {
        Self {
            grace_period_days: 7,
            cutoff_days: 31,
            minimum_fee: dec!(1000),
            due_amount_rate: dec!(0.02),
            principal_cap_rate: dec!(0.05),
        }
    }
}

impl LateFeePolicy {
    /// Whether `days_overdue` falls inside the charging window
    pub fn in_fee_window(&self, days_overdue: i64) -> bool {
        days_overdue > self.grace_period_days && days_overdue < self.cutoff_days
    }

    /// Fee for an installment that is `days_overdue` days late.
    ///
    /// # Examples
    ///
    /// ```
    /// use batch_core::calculators::late_fee::LateFeePolicy;
    /// use rust_decimal::Decimal;
    /// use rust_decimal_macros::dec;
    ///
    /// let policy = LateFeePolicy::default();
    /// assert_eq!(policy.late_fee(7, dec!(10000), dec!(100000)), Decimal::ZERO);
    /// assert_eq!(policy.late_fee(8, dec!(10000), dec!(100000)), dec!(1000));
    /// assert_eq!(policy.late_fee(8, dec!(400000), dec!(100000)), dec!(5000));
    /// assert_eq!(policy.late_fee(31, dec!(10000), dec!(100000)), Decimal::ZERO);
    /// ```
    pub fn late_fee(&self, days_overdue: i64, due_amount: Decimal, principal: Decimal) -> Decimal {
        if !self.in_fee_window(days_overdue) {
            return Decimal::ZERO;
        }
        let floor = self.minimum_fee.max(due_amount * self.due_amount_rate);
        let cap = principal * self.principal_cap_rate;
        round_currency(floor.min(cap).max(Decimal::ZERO))
    }
}
