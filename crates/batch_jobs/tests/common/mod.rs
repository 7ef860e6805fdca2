//! Shared fixtures for job tests.

#![allow(dead_code)]

use adapter_notify::{EmailSender, NotificationDispatcher, NotificationSender};
use batch_core::domain::{
    AccountStatus, AccountTier, ApprovalStatus, Loan, LoanStatus, Repayment, RepaymentStatus,
    SavingsAccount, User,
};
use batch_core::types::time::Date;
use batch_jobs::JobContext;
use infra_store::{Gateways, InMemoryStore};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

pub fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

/// In-memory store, recording mail sender and a context wired to both
pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub email: EmailSender,
    pub ctx: JobContext,
}

impl Fixture {
    pub fn new() -> Self {
        let email = EmailSender::mock();
        Self::with_sender(email.clone(), Arc::new(email))
    }

    pub fn with_sender(email: EmailSender, sender: Arc<dyn NotificationSender>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let ctx = JobContext::new(
            Gateways::in_memory(store.clone()),
            Arc::new(NotificationDispatcher::new(sender)),
        );
        Self { store, email, ctx }
    }

    pub fn with_user(self, id: u64, credit_score: Option<u32>) -> Self {
        self.store.insert_user(user(id, credit_score));
        self
    }
}

pub fn user(id: u64, credit_score: Option<u32>) -> User {
    User {
        id,
        name: format!("Customer {}", id),
        email: format!("customer{}@example.com", id),
        credit_score,
        version: 0,
    }
}

pub fn account(id: u64, balance: Decimal, rate: Decimal, opened_on: Date) -> SavingsAccount {
    SavingsAccount {
        id,
        account_number: format!("SAV-{:04}", id),
        user_id: 1,
        balance,
        accrued_interest: dec!(0),
        annual_rate: rate,
        tier: AccountTier::Basic,
        status: AccountStatus::Active,
        opened_on,
        last_interest_calculation_date: None,
        last_accrual_date: None,
        version: 0,
    }
}

pub fn loan(id: u64, principal: Decimal, status: LoanStatus) -> Loan {
    Loan {
        id,
        loan_number: format!("LN-{:04}", id),
        user_id: 1,
        principal_amount: principal,
        total_amount: principal,
        outstanding_amount: principal,
        status,
        approval_status: ApprovalStatus::Approved,
        requested_at: chrono::Utc::now(),
        approved_at: None,
        disbursed_at: None,
        credit_account_id: None,
        savings_account_id: None,
        credit_penalty_pending: false,
        version: 0,
    }
}

pub fn repayment(
    id: u64,
    loan_id: u64,
    due_date: Date,
    due_amount: Decimal,
    status: RepaymentStatus,
) -> Repayment {
    Repayment {
        id,
        loan_id,
        schedule_number: id as u32,
        due_date,
        due_amount,
        late_fee: dec!(0),
        status,
        paid_on: None,
        version: 0,
    }
}
