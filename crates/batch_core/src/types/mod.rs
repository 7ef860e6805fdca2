//! Core time, money and error types.
//!
//! This module provides:
//! - `time`: Calendar date wrapper and duration formatting
//! - `money`: Currency amount alias and the persistence rounding rule
//! - `error`: Domain errors raised by entity state machines

pub mod error;
pub mod money;
pub mod time;

pub use error::DomainError;
pub use money::{round_currency, Money};
pub use time::{format_duration, Date};
