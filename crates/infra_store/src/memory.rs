//! In-memory implementation of every storage contract.
//!
//! Tables are `BTreeMap`s keyed by id so candidate sets come back in a
//! stable order. Each table has its own lock and no lock is held across an
//! `await`, so a save is atomic per entity, the same guarantee a row-level
//! transaction gives.

use async_trait::async_trait;
use batch_core::domain::{
    AccountId, DailyBalanceSnapshot, Loan, LoanId, Repayment, RepaymentId, RepaymentStatus,
    SavingsAccount, Transaction, TransactionId, TransactionStatus, TransactionType, User, UserId,
};
use batch_core::types::time::Date;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::gateway::{
    LoanGateway, RepaymentGateway, SavingsAccountGateway, SnapshotGateway, TransactionLedger,
    UserGateway,
};

/// Entities saved with optimistic locking
trait Versioned: Clone {
    const ENTITY: &'static str;
    fn key(&self) -> u64;
    fn version(&self) -> u64;
    fn set_version(&mut self, version: u64);
}

macro_rules! versioned {
    ($ty:ty, $name:literal) => {
        impl Versioned for $ty {
            const ENTITY: &'static str = $name;
            fn key(&self) -> u64 {
                self.id
            }
            fn version(&self) -> u64 {
                self.version
            }
            fn set_version(&mut self, version: u64) {
                self.version = version;
            }
        }
    };
}

versioned!(SavingsAccount, "savings account");
versioned!(Repayment, "repayment");
versioned!(Loan, "loan");
versioned!(User, "user");

// A poisoned lock only means a writer panicked between statements that
// each leave the map consistent, so the data is still usable.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn save_versioned<T: Versioned>(table: &RwLock<BTreeMap<u64, T>>, entity: &T) -> StoreResult<T> {
    let mut rows = write(table);
    let stored = rows.get_mut(&entity.key()).ok_or(StoreError::NotFound {
        entity: T::ENTITY,
        id: entity.key(),
    })?;
    if stored.version() != entity.version() {
        return Err(StoreError::VersionConflict {
            entity: T::ENTITY,
            id: entity.key(),
            expected: entity.version(),
            found: stored.version(),
        });
    }
    let mut next = entity.clone();
    next.set_version(entity.version() + 1);
    *stored = next.clone();
    debug!(entity = T::ENTITY, id = entity.key(), version = next.version(), "Saved");
    Ok(next)
}

fn select<T: Clone>(table: &RwLock<BTreeMap<u64, T>>, pred: impl Fn(&T) -> bool) -> Vec<T> {
    read(table).values().filter(|row| pred(*row)).cloned().collect()
}

/// Reference store backing all gateways
#[derive(Default)]
pub struct InMemoryStore {
    accounts: RwLock<BTreeMap<AccountId, SavingsAccount>>,
    snapshots: RwLock<BTreeMap<(AccountId, Date), DailyBalanceSnapshot>>,
    repayments: RwLock<BTreeMap<RepaymentId, Repayment>>,
    loans: RwLock<BTreeMap<LoanId, Loan>>,
    users: RwLock<BTreeMap<UserId, User>>,
    transactions: RwLock<BTreeMap<TransactionId, Transaction>>,
    next_transaction_id: AtomicU64,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account as-is
    pub fn insert_account(&self, account: SavingsAccount) {
        write(&self.accounts).insert(account.id, account);
    }

    /// Insert or replace a loan as-is
    pub fn insert_loan(&self, loan: Loan) {
        write(&self.loans).insert(loan.id, loan);
    }

    /// Insert or replace a repayment as-is
    pub fn insert_repayment(&self, repayment: Repayment) {
        write(&self.repayments).insert(repayment.id, repayment);
    }

    /// Insert or replace a user as-is
    pub fn insert_user(&self, user: User) {
        write(&self.users).insert(user.id, user);
    }

    /// Current stored account
    pub fn account(&self, id: AccountId) -> Option<SavingsAccount> {
        read(&self.accounts).get(&id).cloned()
    }

    /// Current stored loan
    pub fn loan(&self, id: LoanId) -> Option<Loan> {
        read(&self.loans).get(&id).cloned()
    }

    /// Current stored repayment
    pub fn repayment(&self, id: RepaymentId) -> Option<Repayment> {
        read(&self.repayments).get(&id).cloned()
    }

    /// Current stored user
    pub fn user(&self, id: UserId) -> Option<User> {
        read(&self.users).get(&id).cloned()
    }

    /// All snapshots across accounts
    pub fn snapshot_count(&self) -> usize {
        read(&self.snapshots).len()
    }

    /// Every recorded transaction, oldest first
    pub fn transactions(&self) -> Vec<Transaction> {
        read(&self.transactions).values().cloned().collect()
    }
}

#[async_trait]
impl SavingsAccountGateway for InMemoryStore {
    async fn find_active_savings_accounts(&self) -> StoreResult<Vec<SavingsAccount>> {
        Ok(select(&self.accounts, SavingsAccount::is_active))
    }

    async fn save_savings_account(&self, account: &SavingsAccount) -> StoreResult<SavingsAccount> {
        save_versioned(&self.accounts, account)
    }
}

#[async_trait]
impl SnapshotGateway for InMemoryStore {
    async fn append_snapshot(&self, snapshot: DailyBalanceSnapshot) -> StoreResult<()> {
        let key = (snapshot.account_id, snapshot.snapshot_date);
        let mut rows = write(&self.snapshots);
        if rows.contains_key(&key) {
            return Err(StoreError::Duplicate {
                entity: "balance snapshot",
                key: format!("{}@{}", key.0, key.1),
            });
        }
        rows.insert(key, snapshot);
        Ok(())
    }

    async fn find_snapshots(&self, account_id: AccountId) -> StoreResult<Vec<DailyBalanceSnapshot>> {
        Ok(read(&self.snapshots)
            .iter()
            .filter(|((id, _), _)| *id == account_id)
            .map(|(_, snapshot)| snapshot.clone())
            .collect())
    }
}

#[async_trait]
impl RepaymentGateway for InMemoryStore {
    async fn find_overdue_repayments(&self, as_of: Date) -> StoreResult<Vec<Repayment>> {
        Ok(select(&self.repayments, |r| {
            r.status == RepaymentStatus::Scheduled && r.due_date < as_of
        }))
    }

    async fn find_repayments_by_status(&self, status: RepaymentStatus) -> StoreResult<Vec<Repayment>> {
        Ok(select(&self.repayments, |r| r.status == status))
    }

    async fn find_repayments_due_on(&self, date: Date) -> StoreResult<Vec<Repayment>> {
        Ok(select(&self.repayments, |r| {
            r.status == RepaymentStatus::Scheduled && r.due_date == date
        }))
    }

    async fn save_repayment(&self, repayment: &Repayment) -> StoreResult<Repayment> {
        save_versioned(&self.repayments, repayment)
    }
}

#[async_trait]
impl LoanGateway for InMemoryStore {
    async fn find_loan(&self, id: LoanId) -> StoreResult<Option<Loan>> {
        Ok(self.loan(id))
    }

    async fn save_loan(&self, loan: &Loan) -> StoreResult<Loan> {
        save_versioned(&self.loans, loan)
    }
}

#[async_trait]
impl UserGateway for InMemoryStore {
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.user(id))
    }

    async fn save_user(&self, user: &User) -> StoreResult<User> {
        save_versioned(&self.users, user)
    }
}

#[async_trait]
impl TransactionLedger for InMemoryStore {
    async fn create_transaction(
        &self,
        user_id: UserId,
        account_id: AccountId,
        kind: TransactionType,
        amount: Decimal,
        description: String,
    ) -> StoreResult<Transaction> {
        let id = self.next_transaction_id.fetch_add(1, Ordering::SeqCst) + 1;
        let transaction = Transaction {
            id,
            user_id,
            account_id,
            kind,
            amount,
            description,
            status: TransactionStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
        };
        write(&self.transactions).insert(id, transaction.clone());
        Ok(transaction)
    }

    async fn complete_transaction(&self, id: TransactionId) -> StoreResult<Transaction> {
        let mut rows = write(&self.transactions);
        let transaction = rows.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "transaction",
            id,
        })?;
        if transaction.status == TransactionStatus::Pending {
            transaction.status = TransactionStatus::Completed;
            transaction.completed_at = Some(Utc::now());
        }
        Ok(transaction.clone())
    }

    async fn find_transactions(&self, account_id: AccountId) -> StoreResult<Vec<Transaction>> {
        Ok(read(&self.transactions)
            .values()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batch_core::domain::{AccountStatus, AccountTier};
    use rust_decimal_macros::dec;

    fn account(id: AccountId, status: AccountStatus) -> SavingsAccount {
        SavingsAccount {
            id,
            account_number: format!("SAV-{:04}", id),
            user_id: 1,
            balance: dec!(1000),
            accrued_interest: dec!(0),
            annual_rate: dec!(2),
            tier: AccountTier::Basic,
            status,
            opened_on: Date::from_ymd(2025, 1, 1).unwrap(),
            last_interest_calculation_date: None,
            last_accrual_date: None,
            version: 0,
        }
    }

    #[tokio::test]
    async fn test_find_active_filters_status() {
        let store = InMemoryStore::new();
        store.insert_account(account(1, AccountStatus::Active));
        store.insert_account(account(2, AccountStatus::Suspended));
        store.insert_account(account(3, AccountStatus::Active));

        let ids: Vec<_> = store
            .find_active_savings_accounts()
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_save_bumps_version_and_detects_conflict() {
        let store = InMemoryStore::new();
        store.insert_account(account(1, AccountStatus::Active));

        let mut first = store.account(1).unwrap();
        let stale = first.clone();
        first.balance = dec!(2000);
        let saved = store.save_savings_account(&first).await.unwrap();
        assert_eq!(saved.version, 1);

        let err = store.save_savings_account(&stale).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::VersionConflict {
                entity: "savings account",
                id: 1,
                expected: 0,
                found: 1
            }
        );
        assert_eq!(store.account(1).unwrap().balance, dec!(2000));
    }

    #[tokio::test]
    async fn test_save_unknown_is_not_found() {
        let store = InMemoryStore::new();
        let err = store
            .save_savings_account(&account(9, AccountStatus::Active))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 9, .. }));
    }

    #[tokio::test]
    async fn test_snapshot_once_per_day() {
        let store = InMemoryStore::new();
        let acc = account(1, AccountStatus::Active);
        let day = Date::from_ymd(2026, 10, 18).unwrap();

        store
            .append_snapshot(DailyBalanceSnapshot::capture(&acc, day))
            .await
            .unwrap();
        let dup = store.append_snapshot(DailyBalanceSnapshot::capture(&acc, day)).await;
        assert!(matches!(dup, Err(StoreError::Duplicate { .. })));

        store
            .append_snapshot(DailyBalanceSnapshot::capture(&acc, day.add_days(1)))
            .await
            .unwrap();
        assert_eq!(store.find_snapshots(1).await.unwrap().len(), 2);
        assert_eq!(store.snapshot_count(), 2);
    }

    #[tokio::test]
    async fn test_ledger_create_and_complete() {
        let store = InMemoryStore::new();
        let tx = store
            .create_transaction(1, 1, TransactionType::InterestCredit, dec!(12.5), "interest".into())
            .await
            .unwrap();
        assert_eq!(tx.status, TransactionStatus::Pending);

        let done = store.complete_transaction(tx.id).await.unwrap();
        assert_eq!(done.status, TransactionStatus::Completed);
        assert!(done.completed_at.is_some());

        assert!(store.complete_transaction(999).await.is_err());

        store
            .create_transaction(1, 2, TransactionType::InterestCredit, dec!(3), "other".into())
            .await
            .unwrap();
        let on_account = store.find_transactions(1).await.unwrap();
        assert_eq!(on_account.len(), 1);
        assert_eq!(on_account[0].status, TransactionStatus::Completed);
    }
}
