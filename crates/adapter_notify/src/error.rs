//! Notification error types.

use thiserror::Error;

/// Why a notification was not handed over for delivery
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// Empty recipient list
    #[error("No recipients specified")]
    NoRecipients,

    /// Payload could not be serialised
    #[error("Payload error: {0}")]
    Payload(String),

    /// Delivery queue is at capacity
    #[error("Notification queue full")]
    QueueFull,

    /// Delivery queue has been shut down
    #[error("Notification queue closed")]
    QueueClosed,

    /// Downstream delivery failed
    #[error("Transport error: {0}")]
    Transport(String),
}

impl NotifyError {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

impl From<serde_json::Error> for NotifyError {
    fn from(e: serde_json::Error) -> Self {
        Self::Payload(e.to_string())
    }
}
