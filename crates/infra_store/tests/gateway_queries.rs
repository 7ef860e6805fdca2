//! Query gateway contract tests against the in-memory store.

use batch_core::domain::{Repayment, RepaymentStatus};
use batch_core::types::time::Date;
use infra_store::{Gateways, InMemoryStore, RepaymentGateway};
use rust_decimal_macros::dec;
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

fn repayment(id: u64, due: Date, status: RepaymentStatus) -> Repayment {
    Repayment {
        id,
        loan_id: 1,
        schedule_number: id as u32,
        due_date: due,
        due_amount: dec!(10000),
        late_fee: dec!(0),
        status,
        paid_on: None,
        version: 0,
    }
}

fn seeded() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store.insert_repayment(repayment(1, date(2026, 10, 17), RepaymentStatus::Scheduled));
    store.insert_repayment(repayment(2, date(2026, 10, 18), RepaymentStatus::Scheduled));
    store.insert_repayment(repayment(3, date(2026, 10, 1), RepaymentStatus::Overdue));
    store.insert_repayment(repayment(4, date(2026, 10, 21), RepaymentStatus::Scheduled));
    store.insert_repayment(repayment(5, date(2026, 10, 21), RepaymentStatus::Paid));
    store.insert_repayment(repayment(6, date(2026, 9, 1), RepaymentStatus::Paid));
    store
}

fn ids(rows: &[Repayment]) -> Vec<u64> {
    rows.iter().map(|r| r.id).collect()
}

/// Only SCHEDULED rows strictly before the cut-off are overdue candidates.
#[tokio::test]
async fn test_find_overdue_is_strictly_before() {
    let store = seeded();
    let rows = store.find_overdue_repayments(date(2026, 10, 18)).await.unwrap();
    assert_eq!(ids(&rows), vec![1]);
}

#[tokio::test]
async fn test_find_by_status() {
    let store = seeded();
    let rows = store
        .find_repayments_by_status(RepaymentStatus::Overdue)
        .await
        .unwrap();
    assert_eq!(ids(&rows), vec![3]);
}

/// Due-on matches the exact date and ignores settled rows.
#[tokio::test]
async fn test_find_due_on_exact_date() {
    let store = seeded();
    let rows = store.find_repayments_due_on(date(2026, 10, 21)).await.unwrap();
    assert_eq!(ids(&rows), vec![4]);
    assert!(store
        .find_repayments_due_on(date(2026, 10, 20))
        .await
        .unwrap()
        .is_empty());
}

/// The gateway bundle shares one backing store.
#[tokio::test]
async fn test_gateway_bundle_shares_store() {
    let store = seeded();
    let gateways = Gateways::in_memory(store.clone());

    let mut row = store.repayment(1).unwrap();
    row.mark_overdue().unwrap();
    gateways.repayments.save_repayment(&row).await.unwrap();

    assert_eq!(store.repayment(1).unwrap().status, RepaymentStatus::Overdue);
    assert_eq!(store.repayment(1).unwrap().version, 1);
}
