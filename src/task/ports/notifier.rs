//! Outbound notification port for lifecycle side effects.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// A rendered notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    recipients: Vec<String>,
    subject: String,
    body: String,
}

impl OutboundMessage {
    /// Creates a message for the given recipients.
    #[must_use]
    pub fn new(
        recipients: Vec<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            recipients,
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Returns the recipient addresses.
    #[must_use]
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// Returns the message subject.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the message body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Best-effort delivery contract for lifecycle notifications.
///
/// Delivery failures must never affect the lifecycle operation that produced
/// the message; callers dispatch asynchronously and log errors.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers a message to its recipients.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError`] when the underlying channel rejects the
    /// message.
    async fn deliver(&self, message: OutboundMessage) -> Result<(), NotifierError>;
}

/// Errors returned by notifier implementations.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The delivery channel failed.
    #[error("notification delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotifierError {
    /// Wraps a delivery error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
