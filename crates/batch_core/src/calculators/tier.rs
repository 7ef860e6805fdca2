//! Savings tier thresholds and benefits.
//!
//! | Tier     | Min balance | Min age   |
//! |----------|-------------|-----------|
//! | Basic    | 0           | 0 months  |
//! | Silver   | 500,000     | 0 months  |
//! | Gold     | 2,000,000   | 6 months  |
//! | Platinum | 10,000,000  | 12 months |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::domain::AccountTier;

/// Entry requirements for a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierRequirement {
    /// Minimum balance
    pub min_balance: Decimal,
    /// Minimum whole months since the account was opened
    pub min_age_months: u32,
}

/// What a tier gives the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierBenefits {
    /// Annual interest rate in percent
    pub annual_rate: Decimal,
    /// Daily deposit limit
    pub daily_deposit_limit: Decimal,
    /// Daily withdrawal limit
    pub daily_withdrawal_limit: Decimal,
}

impl AccountTier {
    /// Entry requirements for this tier
    pub fn requirement(&self) -> TierRequirement {
        let (min_balance, min_age_months) = match self {
            Self::Basic => (Decimal::ZERO, 0),
            Self::Silver => (dec!(500000), 0),
            Self::Gold => (dec!(2000000), 6),
            Self::Platinum => (dec!(10000000), 12),
        };
        TierRequirement {
            min_balance,
            min_age_months,
        }
    }

    /// Benefits attached to this tier
    pub fn benefits(&self) -> TierBenefits {
        let (annual_rate, daily_deposit_limit, daily_withdrawal_limit) = match self {
            Self::Basic => (dec!(2.0), dec!(5000000), dec!(1000000)),
            Self::Silver => (dec!(2.5), dec!(10000000), dec!(3000000)),
            Self::Gold => (dec!(3.0), dec!(50000000), dec!(10000000)),
            Self::Platinum => (dec!(3.5), dec!(100000000), dec!(30000000)),
        };
        TierBenefits {
            annual_rate,
            daily_deposit_limit,
            daily_withdrawal_limit,
        }
    }

    /// Whether an account with this balance and age meets the tier's bar
    pub fn is_met_by(&self, balance: Decimal, age_months: u32) -> bool {
        let req = self.requirement();
        balance >= req.min_balance && age_months >= req.min_age_months
    }
}

/// Highest tier an account with `balance` and `age_months` qualifies for.
pub fn qualifying_tier(balance: Decimal, age_months: u32) -> AccountTier {
    AccountTier::ALL
        .iter()
        .rev()
        .copied()
        .find(|tier| tier.is_met_by(balance, age_months))
        .unwrap_or(AccountTier::Basic)
}

/// The tier to move to, if the account qualifies for one above `current`.
///
/// Never returns a downgrade.
///
/// # Examples
///
/// ```
/// use batch_core::calculators::tier::evaluate_upgrade;
/// use batch_core::domain::AccountTier;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(evaluate_upgrade(AccountTier::Basic, dec!(600000), 1), Some(AccountTier::Silver));
/// // Gold balance but too young: only Silver
/// assert_eq!(evaluate_upgrade(AccountTier::Basic, dec!(3000000), 5), Some(AccountTier::Silver));
/// assert_eq!(evaluate_upgrade(AccountTier::Gold, dec!(100), 1), None);
/// ```
pub fn evaluate_upgrade(current: AccountTier, balance: Decimal, age_months: u32) -> Option<AccountTier> {
    let qualified = qualifying_tier(balance, age_months);
    (qualified > current).then_some(qualified)
}
