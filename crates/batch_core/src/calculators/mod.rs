//! Pure calculators used by the job services.
//!
//! No I/O and no entity mutation: each function maps amounts, rates and day
//! counts to an amount or a decision.

pub mod delinquency;
pub mod interest;
pub mod late_fee;
pub mod tier;
