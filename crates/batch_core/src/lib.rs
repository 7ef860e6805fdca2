//! # batch_core: Domain Foundation for the Lending Batch Engine
//!
//! ## Layer 1 (Foundation) Role
//!
//! batch_core is the bottom layer of the workspace, providing:
//! - Calendar helpers: `Date`, month-end detection, month arithmetic (`types::time`)
//! - Currency policy: two-decimal, round-half-up amounts (`types::money`)
//! - Domain entities and their state machines (`domain`)
//! - Pure calculators for interest, late fees, delinquency and tiers (`calculators`)
//!
//! Nothing in this crate performs I/O. Storage, notification and scheduling
//! live in the infra, adapter and service layers.
//!
//! ## Usage Examples
//!
//! ```rust
//! use batch_core::calculators::interest::daily_interest;
//! use batch_core::calculators::late_fee::LateFeePolicy;
//! use batch_core::types::money::round_currency;
//! use rust_decimal_macros::dec;
//!
//! let accrued = round_currency(daily_interest(dec!(100000), dec!(5.0)));
//! assert_eq!(accrued, dec!(13.70));
//!
//! let fee = LateFeePolicy::default().late_fee(8, dec!(10000), dec!(100000));
//! assert_eq!(fee, dec!(1000));
//! ```

pub mod calculators;
pub mod domain;
pub mod types;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::calculators::delinquency::DelinquencyPolicy;
    pub use crate::calculators::interest::daily_interest;
    pub use crate::calculators::late_fee::LateFeePolicy;
    pub use crate::calculators::tier::{evaluate_upgrade, TierBenefits};
    pub use crate::domain::{
        AccountId, AccountStatus, AccountTier, ApprovalStatus, DailyBalanceSnapshot, Loan,
        LoanId, LoanStatus, Repayment, RepaymentId, RepaymentStatus, SavingsAccount,
        Transaction, TransactionId, TransactionStatus, TransactionType, User, UserId,
    };
    pub use crate::types::error::DomainError;
    pub use crate::types::money::{round_currency, Money};
    pub use crate::types::time::Date;
}
