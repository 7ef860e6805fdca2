//! Domain entities touched by the batch jobs.
//!
//! Entities are plain data with the state-machine rules attached as
//! methods. Every mutable entity carries a `version` used by the store for
//! optimistic locking; entity methods never touch it.

mod account;
mod loan;
mod repayment;
mod transaction;
mod user;

pub use account::{AccountStatus, AccountTier, DailyBalanceSnapshot, SavingsAccount};
pub use loan::{ApprovalStatus, Loan, LoanStatus};
pub use repayment::{Repayment, RepaymentStatus};
pub use transaction::{Transaction, TransactionStatus, TransactionType};
pub use user::User;

/// Savings account identifier
pub type AccountId = u64;
/// Loan identifier
pub type LoanId = u64;
/// Repayment schedule entry identifier
pub type RepaymentId = u64;
/// User identifier
pub type UserId = u64;
/// Ledger transaction identifier
pub type TransactionId = u64;
