//! Notification delivery contract and the mock email sender.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

use crate::error::NotifyError;
use crate::template::Template;

/// Delivery contract of the template-rendering subsystem.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Render `template` with `data` and send it to `recipients`
    async fn send_template_email(
        &self,
        template: Template,
        recipients: &[String],
        data: serde_json::Value,
    ) -> Result<(), NotifyError>;
}

/// Record of a sent email
#[derive(Debug, Clone, Serialize)]
pub struct SentEmail {
    /// Email ID
    pub email_id: String,
    /// From address
    pub from: String,
    /// To addresses
    pub to: Vec<String>,
    /// Template id
    pub template: &'static str,
    /// Subject
    pub subject: String,
    /// Template data
    pub data: serde_json::Value,
    /// Sent timestamp
    pub sent_at: String,
}

/// Mock email sender that records instead of delivering
#[derive(Clone)]
pub struct EmailSender {
    /// SMTP server (mock)
    smtp_server: String,
    /// From address
    from_address: String,
    /// Sent emails log
    sent_emails: Arc<RwLock<Vec<SentEmail>>>,
    /// Email ID sequence
    sequence: Arc<AtomicU64>,
}

impl EmailSender {
    /// Create a new email sender
    pub fn new(smtp_server: &str, from_address: &str) -> Self {
        Self {
            smtp_server: smtp_server.to_string(),
            from_address: from_address.to_string(),
            sent_emails: Arc::new(RwLock::new(Vec::new())),
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create with default settings (mock)
    pub fn mock() -> Self {
        Self::new("smtp.lending.local", "no-reply@lending.local")
    }

    /// Get sent emails
    pub fn sent_emails(&self) -> Vec<SentEmail> {
        self.sent_emails
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Sent emails rendered with `template`
    pub fn sent_with(&self, template: Template) -> Vec<SentEmail> {
        self.sent_emails()
            .into_iter()
            .filter(|e| e.template == template.id())
            .collect()
    }

    /// Get email count
    pub fn email_count(&self) -> usize {
        self.sent_emails
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Get SMTP server
    pub fn smtp_server(&self) -> &str {
        &self.smtp_server
    }

    /// Get from address
    pub fn from_address(&self) -> &str {
        &self.from_address
    }
}

#[async_trait]
impl NotificationSender for EmailSender {
    async fn send_template_email(
        &self,
        template: Template,
        recipients: &[String],
        data: serde_json::Value,
    ) -> Result<(), NotifyError> {
        if recipients.is_empty() {
            return Err(NotifyError::NoRecipients);
        }

        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let email = SentEmail {
            email_id: format!("EMAIL-{:08}", seq),
            from: self.from_address.clone(),
            to: recipients.to_vec(),
            template: template.id(),
            subject: template.subject().to_string(),
            data,
            sent_at: chrono::Utc::now().to_rfc3339(),
        };

        info!(
            email_id = %email.email_id,
            to = ?email.to,
            template = %template,
            "Email sent (mock)"
        );

        self.sent_emails
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(email);
        Ok(())
    }
}
