//! Query gateways and write contracts.
//!
//! Each trait covers one entity and exposes only the queries the batch
//! needs. Saves take the entity as read (including its `version`) and
//! return the stored copy with the bumped version.

use async_trait::async_trait;
use batch_core::domain::{
    AccountId, DailyBalanceSnapshot, Loan, LoanId, Repayment, RepaymentStatus, SavingsAccount,
    Transaction, TransactionId, TransactionType, User, UserId,
};
use batch_core::types::time::Date;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::error::StoreResult;
use crate::memory::InMemoryStore;

/// Savings account reads and writes
#[async_trait]
pub trait SavingsAccountGateway: Send + Sync {
    /// All accounts with status ACTIVE
    async fn find_active_savings_accounts(&self) -> StoreResult<Vec<SavingsAccount>>;

    /// Versioned save of one account
    async fn save_savings_account(&self, account: &SavingsAccount) -> StoreResult<SavingsAccount>;
}

/// Append-only daily balance history
#[async_trait]
pub trait SnapshotGateway: Send + Sync {
    /// Append a snapshot; a second one for the same account and date is a
    /// `Duplicate` error.
    async fn append_snapshot(&self, snapshot: DailyBalanceSnapshot) -> StoreResult<()>;

    /// Snapshots of one account, oldest first
    async fn find_snapshots(&self, account_id: AccountId) -> StoreResult<Vec<DailyBalanceSnapshot>>;
}

/// Repayment schedule queries
#[async_trait]
pub trait RepaymentGateway: Send + Sync {
    /// SCHEDULED repayments whose due date is strictly before `as_of`
    async fn find_overdue_repayments(&self, as_of: Date) -> StoreResult<Vec<Repayment>>;

    /// All repayments in `status`
    async fn find_repayments_by_status(&self, status: RepaymentStatus) -> StoreResult<Vec<Repayment>>;

    /// SCHEDULED repayments due exactly on `date`
    async fn find_repayments_due_on(&self, date: Date) -> StoreResult<Vec<Repayment>>;

    /// Versioned save of one repayment
    async fn save_repayment(&self, repayment: &Repayment) -> StoreResult<Repayment>;
}

/// Loan lookups and writes
#[async_trait]
pub trait LoanGateway: Send + Sync {
    /// Loan by id
    async fn find_loan(&self, id: LoanId) -> StoreResult<Option<Loan>>;

    /// Versioned save of one loan
    async fn save_loan(&self, loan: &Loan) -> StoreResult<Loan>;
}

/// User profile lookups and writes
#[async_trait]
pub trait UserGateway: Send + Sync {
    /// User by id
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Versioned save of one user
    async fn save_user(&self, user: &User) -> StoreResult<User>;
}

/// Transaction recording, owned by the ledger subsystem
#[async_trait]
pub trait TransactionLedger: Send + Sync {
    /// Record a PENDING transaction
    async fn create_transaction(
        &self,
        user_id: UserId,
        account_id: AccountId,
        kind: TransactionType,
        amount: Decimal,
        description: String,
    ) -> StoreResult<Transaction>;

    /// Settle a PENDING transaction
    async fn complete_transaction(&self, id: TransactionId) -> StoreResult<Transaction>;

    /// Transactions recorded on one account, oldest first
    async fn find_transactions(&self, account_id: AccountId) -> StoreResult<Vec<Transaction>>;
}

/// The full set of storage collaborators, wired once at startup.
#[derive(Clone)]
pub struct Gateways {
    /// Savings accounts
    pub accounts: Arc<dyn SavingsAccountGateway>,
    /// Balance snapshots
    pub snapshots: Arc<dyn SnapshotGateway>,
    /// Repayment schedule
    pub repayments: Arc<dyn RepaymentGateway>,
    /// Loans
    pub loans: Arc<dyn LoanGateway>,
    /// Users
    pub users: Arc<dyn UserGateway>,
    /// Transaction ledger
    pub ledger: Arc<dyn TransactionLedger>,
}

impl Gateways {
    /// Every gateway served by one in-memory store
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            accounts: store.clone(),
            snapshots: store.clone(),
            repayments: store.clone(),
            loans: store.clone(),
            users: store.clone(),
            ledger: store,
        }
    }
}
