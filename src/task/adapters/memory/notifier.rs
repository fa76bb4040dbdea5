//! Recording notifier for exercising the outbound mail port in tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::task::ports::{Notifier, NotifierError, OutboundMessage};

/// Notifier that captures every delivered message.
///
/// Can be switched to a failing mode to verify that delivery failures never
/// leak into lifecycle results.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    failing: bool,
}

impl RecordingNotifier {
    /// Creates a notifier that records successfully.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a notifier whose every delivery fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing: true,
        }
    }

    /// Returns a snapshot of the messages delivered so far.
    #[must_use]
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, message: OutboundMessage) -> Result<(), NotifierError> {
        if self.failing {
            return Err(NotifierError::delivery(std::io::Error::other(
                "delivery disabled",
            )));
        }
        let mut sent = self
            .sent
            .lock()
            .map_err(|err| NotifierError::delivery(std::io::Error::other(err.to_string())))?;
        sent.push(message);
        Ok(())
    }
}
