//! Lookup port for resolving user notification addresses.

use crate::task::domain::UserId;
use async_trait::async_trait;

/// Resolves notification addresses for principals referenced by a task.
///
/// The backing system keeps addresses in its user table; this port stands in
/// for that join. Resolution is only consulted on the best-effort
/// notification path, so a missing address simply drops the recipient.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns the notification address for `user_id`, if known.
    async fn email_for(&self, user_id: UserId) -> Option<String>;
}
