//! # Notification Boundary
//!
//! The batch jobs hand customer notifications to a template-rendering
//! subsystem they do not own. This crate defines that contract and the
//! pieces around it:
//!
//! - [`template`]: template ids and the typed payload of each notification
//! - [`sender`]: the [`NotificationSender`] contract and a mock email sender
//! - [`queue`]: a bounded queue that decouples jobs from delivery latency
//! - [`dispatcher`]: the job-facing wrapper that logs and swallows failures
//!
//! Delivery is always attempted after the entity change it reports has been
//! persisted, and a failed delivery never rolls that change back.

pub mod dispatcher;
pub mod error;
pub mod queue;
pub mod sender;
pub mod template;

pub use dispatcher::{DispatchStats, NotificationDispatcher};
pub use error::NotifyError;
pub use queue::QueuedSender;
pub use sender::{EmailSender, NotificationSender, SentEmail};
pub use template::{Notification, Template};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dispatcher::NotificationDispatcher;
    pub use crate::sender::{EmailSender, NotificationSender};
    pub use crate::template::*;
}
