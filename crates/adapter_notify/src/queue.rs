//! Bounded delivery queue.
//!
//! [`QueuedSender`] accepts notifications without waiting for delivery and
//! hands them to a background worker that forwards to the real sender. When
//! the queue is full the notification is rejected immediately with
//! [`NotifyError::QueueFull`]; a job is never blocked by a slow mail
//! backend.

use async_channel::{Receiver, Sender, TrySendError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::NotifyError;
use crate::sender::NotificationSender;
use crate::template::Template;

struct Envelope {
    template: Template,
    recipients: Vec<String>,
    data: serde_json::Value,
}

/// Fire-and-forget front for any [`NotificationSender`]
#[derive(Clone)]
pub struct QueuedSender {
    tx: Sender<Envelope>,
}

impl QueuedSender {
    /// Start the delivery worker.
    ///
    /// The returned handle resolves to the number of notifications delivered
    /// once the queue is closed and drained.
    pub fn spawn(inner: Arc<dyn NotificationSender>, capacity: usize) -> (Self, JoinHandle<u64>) {
        let (tx, rx) = async_channel::bounded(capacity.max(1));
        let handle = tokio::spawn(Self::deliver(inner, rx));
        (Self { tx }, handle)
    }

    async fn deliver(inner: Arc<dyn NotificationSender>, rx: Receiver<Envelope>) -> u64 {
        let mut delivered = 0;
        while let Ok(envelope) = rx.recv().await {
            match inner
                .send_template_email(envelope.template, &envelope.recipients, envelope.data)
                .await
            {
                Ok(()) => delivered += 1,
                Err(e) => warn!(
                    template = %envelope.template,
                    recipients = ?envelope.recipients,
                    error = %e,
                    "Queued notification delivery failed"
                ),
            }
        }
        debug!(delivered, "Notification queue drained");
        delivered
    }

    /// Stop accepting notifications; queued ones are still delivered
    pub fn close(&self) {
        self.tx.close();
    }

    /// Notifications waiting for delivery
    pub fn pending(&self) -> usize {
        self.tx.len()
    }
}

#[async_trait]
impl NotificationSender for QueuedSender {
    async fn send_template_email(
        &self,
        template: Template,
        recipients: &[String],
        data: serde_json::Value,
    ) -> Result<(), NotifyError> {
        if recipients.is_empty() {
            return Err(NotifyError::NoRecipients);
        }
        let envelope = Envelope {
            template,
            recipients: recipients.to_vec(),
            data,
        };
        self.tx.try_send(envelope).map_err(|e| match e {
            TrySendError::Full(_) => NotifyError::QueueFull,
            TrySendError::Closed(_) => NotifyError::QueueClosed,
        })
    }
}
