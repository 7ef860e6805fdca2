//! End-to-end job behaviour against the in-memory store.

mod common;

use adapter_notify::Template;
use batch_core::calculators::delinquency::DelinquencyPolicy;
use batch_core::calculators::late_fee::LateFeePolicy;
use batch_core::domain::{AccountTier, LoanStatus, RepaymentStatus, TransactionStatus, TransactionType};
use batch_jobs::jobs::{
    LateFeeJob, LoanDefaultJob, LoanOverdueJob, RepaymentReminderJob, SavingsInterestJob,
    TierUpgradeJob,
};
use batch_jobs::BatchJob;
use common::{account, date, loan, repayment, Fixture};
use infra_store::SnapshotGateway;
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Interest accrual
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_interest_accrues_one_day_without_touching_balance() {
    let fx = Fixture::new().with_user(1, None);
    fx.store
        .insert_account(account(1, dec!(100000), dec!(5.0), date(2025, 1, 1)));
    let job = SavingsInterestJob::new(fx.ctx.clone());

    let report = job.run(date(2026, 10, 18)).await.unwrap();

    let stored = fx.store.account(1).unwrap();
    assert_eq!(stored.accrued_interest, dec!(13.70));
    assert_eq!(stored.balance, dec!(100000));
    assert_eq!(stored.last_accrual_date, Some(date(2026, 10, 18)));
    assert_eq!(fx.store.snapshot_count(), 1);
    assert_eq!(fx.email.email_count(), 0);
    assert_eq!((report.processed, report.succeeded), (1, 1));
}

#[tokio::test]
async fn test_interest_rerun_same_day_is_skipped() {
    let fx = Fixture::new().with_user(1, None);
    fx.store
        .insert_account(account(1, dec!(100000), dec!(5.0), date(2025, 1, 1)));
    let job = SavingsInterestJob::new(fx.ctx.clone());
    let today = date(2026, 10, 18);

    job.run(today).await.unwrap();
    let second = job.run(today).await.unwrap();

    assert_eq!(second.skipped, 1);
    assert_eq!(fx.store.account(1).unwrap().accrued_interest, dec!(13.70));
    assert_eq!(fx.store.snapshot_count(), 1);
}

#[tokio::test]
async fn test_interest_zero_cases_still_snapshot() {
    let fx = Fixture::new().with_user(1, None);
    fx.store
        .insert_account(account(1, dec!(0), dec!(5.0), date(2025, 1, 1)));
    fx.store
        .insert_account(account(2, dec!(50000), dec!(0), date(2025, 1, 1)));
    let job = SavingsInterestJob::new(fx.ctx.clone());

    let report = job.run(date(2026, 10, 18)).await.unwrap();

    assert_eq!(report.succeeded, 2);
    assert_eq!(fx.store.account(1).unwrap().accrued_interest, dec!(0));
    assert_eq!(fx.store.account(2).unwrap().accrued_interest, dec!(0));
    assert_eq!(fx.store.snapshot_count(), 2);
}

#[tokio::test]
async fn test_interest_compounds_on_last_day_of_month() {
    let fx = Fixture::new().with_user(1, None);
    let mut acc = account(1, dec!(100000), dec!(5.0), date(2025, 1, 1));
    acc.accrued_interest = dec!(100.00);
    fx.store.insert_account(acc);
    let job = SavingsInterestJob::new(fx.ctx.clone());
    let month_end = date(2026, 10, 31);

    job.run(month_end).await.unwrap();

    let stored = fx.store.account(1).unwrap();
    assert_eq!(stored.balance, dec!(100113.70));
    assert_eq!(stored.accrued_interest, dec!(0));
    assert_eq!(stored.last_interest_calculation_date, Some(month_end));

    let transactions = fx.store.transactions();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].kind, TransactionType::InterestCredit);
    assert_eq!(transactions[0].amount, dec!(113.70));
    assert_eq!(transactions[0].status, TransactionStatus::Completed);

    let snapshots = fx.store.find_snapshots(1).await.unwrap();
    assert_eq!(snapshots[0].balance, dec!(100113.70));

    let sent = fx.email.sent_with(Template::InterestCredited);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].data["month"], "October 2026");
    assert_eq!(sent[0].to, vec!["customer1@example.com".to_string()]);
}

#[tokio::test]
async fn test_interest_mid_month_does_not_compound() {
    let fx = Fixture::new().with_user(1, None);
    let mut acc = account(1, dec!(100000), dec!(5.0), date(2025, 1, 1));
    acc.accrued_interest = dec!(100.00);
    fx.store.insert_account(acc);

    SavingsInterestJob::new(fx.ctx.clone())
        .run(date(2026, 10, 30))
        .await
        .unwrap();

    let stored = fx.store.account(1).unwrap();
    assert_eq!(stored.balance, dec!(100000));
    assert_eq!(stored.accrued_interest, dec!(113.70));
    assert!(fx.store.transactions().is_empty());
}

// ---------------------------------------------------------------------------
// Overdue detection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_overdue_marks_only_past_due_scheduled() {
    let fx = Fixture::new().with_user(1, None);
    fx.store
        .insert_loan(loan(1, dec!(1000000), LoanStatus::Active));
    let today = date(2026, 10, 18);
    fx.store.insert_repayment(repayment(
        1,
        1,
        date(2026, 10, 17),
        dec!(10000),
        RepaymentStatus::Scheduled,
    ));
    fx.store
        .insert_repayment(repayment(2, 1, today, dec!(10000), RepaymentStatus::Scheduled));

    let report = LoanOverdueJob::new(fx.ctx.clone()).run(today).await.unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(fx.store.repayment(1).unwrap().status, RepaymentStatus::Overdue);
    assert_eq!(fx.store.repayment(1).unwrap().late_fee, dec!(0));
    assert_eq!(fx.store.repayment(2).unwrap().status, RepaymentStatus::Scheduled);

    let sent = fx.email.sent_with(Template::PaymentOverdue);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].data["days_overdue"], 0);
    assert_eq!(sent[0].data["loan_number"], "LN-0001");
}

// ---------------------------------------------------------------------------
// Late fees
// ---------------------------------------------------------------------------

fn late_fee_fixture() -> Fixture {
    let fx = Fixture::new().with_user(1, None);
    fx.store
        .insert_loan(loan(1, dec!(100000), LoanStatus::Active));
    let today = date(2026, 10, 18);
    // 7, 8 and 31 days late, plus one large installment 8 days late
    for (id, days, due_amount) in [
        (1, 7, dec!(10000)),
        (2, 8, dec!(10000)),
        (3, 31, dec!(10000)),
        (4, 8, dec!(400000)),
    ] {
        fx.store.insert_repayment(repayment(
            id,
            1,
            today.add_days(-days),
            due_amount,
            RepaymentStatus::Overdue,
        ));
    }
    fx
}

#[tokio::test]
async fn test_late_fee_window_floor_and_cap() {
    let fx = late_fee_fixture();
    let job = LateFeeJob::new(fx.ctx.clone(), LateFeePolicy::default());

    let report = job.run(date(2026, 10, 18)).await.unwrap();

    assert_eq!(fx.store.repayment(1).unwrap().late_fee, dec!(0));
    assert_eq!(fx.store.repayment(2).unwrap().late_fee, dec!(1000));
    assert_eq!(fx.store.repayment(3).unwrap().late_fee, dec!(0));
    assert_eq!(fx.store.repayment(4).unwrap().late_fee, dec!(5000));
    assert_eq!((report.succeeded, report.skipped), (2, 2));

    let sent = fx.email.sent_with(Template::LateFeeApplied);
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].data["days_overdue"], 8);
}

#[tokio::test]
async fn test_late_fee_rerun_is_idempotent() {
    let fx = late_fee_fixture();
    let job = LateFeeJob::new(fx.ctx.clone(), LateFeePolicy::default());
    let today = date(2026, 10, 18);

    job.run(today).await.unwrap();
    let second = job.run(today).await.unwrap();

    assert_eq!(second.succeeded, 0);
    let stored = fx.store.repayment(2).unwrap();
    assert_eq!(stored.late_fee, dec!(1000));
    assert_eq!(stored.total_due(), dec!(11000));
    assert_eq!(stored.version, 1);
    assert_eq!(fx.email.sent_with(Template::LateFeeApplied).len(), 2);
}

// ---------------------------------------------------------------------------
// Default escalation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_default_uses_worst_installment_and_penalises_once() {
    let fx = Fixture::new().with_user(1, Some(750));
    let today = date(2026, 10, 18);
    fx.store
        .insert_loan(loan(1, dec!(1000000), LoanStatus::Active));
    fx.store
        .insert_loan(loan(2, dec!(1000000), LoanStatus::Active));
    for (id, loan_id, days) in [(1, 1, 10), (2, 1, 35), (3, 2, 10)] {
        fx.store.insert_repayment(repayment(
            id,
            loan_id,
            today.add_days(-days),
            dec!(10000),
            RepaymentStatus::Overdue,
        ));
    }
    let job = LoanDefaultJob::new(fx.ctx.clone(), DelinquencyPolicy::default());

    let report = job.run(today).await.unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(fx.store.loan(1).unwrap().status, LoanStatus::Defaulted);
    assert_eq!(fx.store.loan(2).unwrap().status, LoanStatus::Active);
    assert_eq!(fx.store.user(1).unwrap().credit_score, Some(700));

    let sent = fx.email.sent_with(Template::LoanDefaulted);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].data["days_overdue"], 31);
    assert_eq!(sent[0].data["credit_score"], 700);

    // Already defaulted: nothing more happens
    let second = job.run(today).await.unwrap();
    assert_eq!(second.skipped, 1);
    assert_eq!(fx.store.user(1).unwrap().credit_score, Some(700));
    assert_eq!(fx.email.sent_with(Template::LoanDefaulted).len(), 1);
}

#[tokio::test]
async fn test_default_credit_score_floors_at_zero() {
    let fx = Fixture::new().with_user(1, Some(30));
    let today = date(2026, 10, 18);
    fx.store
        .insert_loan(loan(1, dec!(1000000), LoanStatus::Disbursed));
    fx.store.insert_repayment(repayment(
        1,
        1,
        today.add_days(-31),
        dec!(10000),
        RepaymentStatus::Overdue,
    ));

    LoanDefaultJob::new(fx.ctx.clone(), DelinquencyPolicy::default())
        .run(today)
        .await
        .unwrap();

    assert_eq!(fx.store.loan(1).unwrap().status, LoanStatus::Defaulted);
    assert_eq!(fx.store.user(1).unwrap().credit_score, Some(0));
}

#[tokio::test]
async fn test_default_without_score_leaves_user_untouched() {
    let fx = Fixture::new().with_user(1, None);
    let today = date(2026, 10, 18);
    fx.store
        .insert_loan(loan(1, dec!(1000000), LoanStatus::Active));
    fx.store.insert_repayment(repayment(
        1,
        1,
        today.add_days(-40),
        dec!(10000),
        RepaymentStatus::Overdue,
    ));

    LoanDefaultJob::new(fx.ctx.clone(), DelinquencyPolicy::default())
        .run(today)
        .await
        .unwrap();

    assert_eq!(fx.store.loan(1).unwrap().status, LoanStatus::Defaulted);
    let user = fx.store.user(1).unwrap();
    assert_eq!((user.credit_score, user.version), (None, 0));
    assert_eq!(fx.email.sent_with(Template::LoanDefaulted).len(), 1);
}

#[tokio::test]
async fn test_default_skips_settled_loans() {
    let fx = Fixture::new().with_user(1, Some(750));
    let today = date(2026, 10, 18);
    fx.store
        .insert_loan(loan(1, dec!(1000000), LoanStatus::FullyPaid));
    fx.store.insert_repayment(repayment(
        1,
        1,
        today.add_days(-45),
        dec!(10000),
        RepaymentStatus::Overdue,
    ));

    let report = LoanDefaultJob::new(fx.ctx.clone(), DelinquencyPolicy::default())
        .run(today)
        .await
        .unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(fx.store.loan(1).unwrap().status, LoanStatus::FullyPaid);
    assert_eq!(fx.store.user(1).unwrap().credit_score, Some(750));
}

// ---------------------------------------------------------------------------
// Tier upgrades
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_tier_upgrades_by_balance_and_age() {
    let fx = Fixture::new().with_user(1, None);
    fx.store
        .insert_account(account(1, dec!(600000), dec!(2.0), date(2026, 9, 1)));
    fx.store
        .insert_account(account(2, dec!(3000000), dec!(2.0), date(2026, 7, 1)));
    fx.store
        .insert_account(account(3, dec!(20000000), dec!(2.0), date(2025, 9, 1)));
    fx.store
        .insert_account(account(4, dec!(100000), dec!(2.0), date(2020, 1, 1)));
    let mut gold = account(5, dec!(100000), dec!(3.0), date(2020, 1, 1));
    gold.tier = AccountTier::Gold;
    fx.store.insert_account(gold);

    let report = TierUpgradeJob::new(fx.ctx.clone())
        .run(date(2026, 10, 1))
        .await
        .unwrap();

    assert_eq!(fx.store.account(1).unwrap().tier, AccountTier::Silver);
    assert_eq!(fx.store.account(2).unwrap().tier, AccountTier::Silver);
    assert_eq!(fx.store.account(3).unwrap().tier, AccountTier::Platinum);
    assert_eq!(fx.store.account(4).unwrap().tier, AccountTier::Basic);
    assert_eq!(fx.store.account(5).unwrap().tier, AccountTier::Gold);
    assert_eq!((report.succeeded, report.skipped), (3, 2));

    // The annual rate is not part of the upgrade
    assert_eq!(fx.store.account(3).unwrap().annual_rate, dec!(2.0));

    let sent = fx.email.sent_with(Template::TierUpgrade);
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].data["old_tier"], "BASIC");
    assert_eq!(sent[0].data["new_tier"], "SILVER");
}

// ---------------------------------------------------------------------------
// Reminders
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_reminder_targets_exact_day() {
    let fx = Fixture::new().with_user(1, None);
    fx.store
        .insert_loan(loan(1, dec!(1000000), LoanStatus::Active));
    let today = date(2026, 10, 18);
    for (id, days, status) in [
        (1, 2, RepaymentStatus::Scheduled),
        (2, 3, RepaymentStatus::Scheduled),
        (3, 4, RepaymentStatus::Scheduled),
        (4, 3, RepaymentStatus::Paid),
    ] {
        fx.store
            .insert_repayment(repayment(id, 1, today.add_days(days), dec!(10000), status));
    }

    let report = RepaymentReminderJob::new(fx.ctx.clone(), 3)
        .run(today)
        .await
        .unwrap();

    assert_eq!(report.processed, 1);
    let sent = fx.email.sent_with(Template::RepaymentDue);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].data["schedule_number"], 2);
    assert_eq!(sent[0].data["days_until_due"], 3);
    assert_eq!(fx.store.repayment(2).unwrap().version, 0);
}
