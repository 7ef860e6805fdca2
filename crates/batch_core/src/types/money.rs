//! Currency amounts.
//!
//! Amounts are `rust_decimal::Decimal`. Intermediate results (a day's
//! interest, a percentage of principal) keep full precision; anything written
//! back to an entity goes through [`round_currency`] first.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency amount in the account's minor-unit-agnostic major units.
pub type Money = Decimal;

/// Decimal places kept for persisted amounts.
pub const CURRENCY_SCALE: u32 = 2;

/// Rounds an amount to [`CURRENCY_SCALE`] places, half away from zero.
///
/// # Examples
///
/// ```
/// use batch_core::types::money::round_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_currency(dec!(13.698630)), dec!(13.70));
/// assert_eq!(round_currency(dec!(0.005)), dec!(0.01));
/// assert_eq!(round_currency(dec!(0.004999)), dec!(0.00));
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_half_up_at_midpoint() {
        assert_eq!(round_currency(dec!(1.125)), dec!(1.13));
        assert_eq!(round_currency(dec!(1.135)), dec!(1.14));
        assert_eq!(round_currency(dec!(1.1249)), dec!(1.12));
    }

    #[test]
    fn test_already_rounded_is_unchanged() {
        assert_eq!(round_currency(dec!(100000.00)), dec!(100000));
        assert_eq!(round_currency(Decimal::ZERO), Decimal::ZERO);
    }
}
