//! Daily savings interest.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Day count used for the daily rate. Leap years are not adjusted for.
pub const DAYS_IN_YEAR: Decimal = dec!(365);

/// One day of simple interest: `balance * (annual_rate_percent / 100) / 365`.
///
/// The result is unrounded; callers round when they persist. A non-positive
/// balance or rate yields zero.
///
/// # Examples
///
/// ```
/// use batch_core::calculators::interest::daily_interest;
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(daily_interest(dec!(36500), dec!(10)), dec!(10));
/// assert_eq!(daily_interest(Decimal::ZERO, dec!(5)), Decimal::ZERO);
/// assert_eq!(daily_interest(dec!(100000), Decimal::ZERO), Decimal::ZERO);
/// ```
pub fn daily_interest(balance: Decimal, annual_rate_percent: Decimal) -> Decimal {
    if balance <= Decimal::ZERO || annual_rate_percent <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    balance * (annual_rate_percent / dec!(100)) / DAYS_IN_YEAR
}
