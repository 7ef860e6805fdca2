//! Job-facing notification dispatch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::sender::NotificationSender;
use crate::template::Notification;

/// Delivery counters since startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Notifications accepted by the sender
    pub sent: u64,
    /// Notifications that failed
    pub failed: u64,
}

/// Wraps a [`NotificationSender`] so that delivery problems are logged and
/// counted but never returned to the caller.
pub struct NotificationDispatcher {
    sender: Arc<dyn NotificationSender>,
    sent: AtomicU64,
    failed: AtomicU64,
}

impl NotificationDispatcher {
    /// Create a dispatcher over `sender`
    pub fn new(sender: Arc<dyn NotificationSender>) -> Self {
        Self {
            sender,
            sent: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Dispatch one notification. Returns whether the sender accepted it.
    pub async fn dispatch(&self, recipients: &[String], notification: Notification) -> bool {
        let template = notification.template();
        let result = match notification.data() {
            Ok(data) => self.sender.send_template_email(template, recipients, data).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                self.sent.fetch_add(1, Ordering::Relaxed);
                debug!(template = %template, recipients = ?recipients, "Notification dispatched");
                true
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                warn!(
                    template = %template,
                    recipients = ?recipients,
                    error = %e,
                    "Notification dispatch failed"
                );
                false
            }
        }
    }

    /// Counters since startup
    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            sent: self.sent.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sender::EmailSender;
    use crate::template::RepaymentDue;
    use batch_core::types::time::Date;
    use rust_decimal_macros::dec;

    fn reminder() -> Notification {
        Notification::RepaymentDue(RepaymentDue {
            customer_name: "Jung".to_string(),
            loan_number: "LN-9".to_string(),
            schedule_number: 4,
            due_date: Date::from_ymd(2026, 10, 21).unwrap(),
            due_amount: dec!(250000),
            days_until_due: 3,
        })
    }

    #[tokio::test]
    async fn test_dispatch_counts_outcomes() {
        let email = EmailSender::mock();
        let dispatcher = NotificationDispatcher::new(Arc::new(email.clone()));

        assert!(dispatcher.dispatch(&["jung@example.com".to_string()], reminder()).await);
        assert!(!dispatcher.dispatch(&[], reminder()).await);

        assert_eq!(dispatcher.stats(), DispatchStats { sent: 1, failed: 1 });
        assert_eq!(email.email_count(), 1);
    }
}
