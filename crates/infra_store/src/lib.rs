//! # infra_store: Storage Boundary
//!
//! The batch engine never talks to a database directly. It reads candidate
//! sets through narrow query gateways and writes one entity at a time
//! through versioned saves:
//!
//! - [`gateway`]: the read/write contracts consumed by the job services
//! - [`memory`]: an in-memory implementation of every contract, used by
//!   tests and by the standalone binary
//! - [`error`]: storage errors
//!
//! Saves are optimistic: an entity carries the `version` it was read at, and
//! a save against a newer stored version fails with
//! [`StoreError::VersionConflict`] instead of overwriting a concurrent write.

pub mod error;
pub mod gateway;
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use gateway::{
    Gateways, LoanGateway, RepaymentGateway, SavingsAccountGateway, SnapshotGateway,
    TransactionLedger, UserGateway,
};
pub use memory::InMemoryStore;
