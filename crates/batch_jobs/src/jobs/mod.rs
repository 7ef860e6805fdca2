//! The six job services.

mod default;
mod interest;
mod late_fee;
mod overdue;
mod reminder;
mod tier;

pub use default::LoanDefaultJob;
pub use interest::SavingsInterestJob;
pub use late_fee::LateFeeJob;
pub use overdue::LoanOverdueJob;
pub use reminder::RepaymentReminderJob;
pub use tier::TierUpgradeJob;
