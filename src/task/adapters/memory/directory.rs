//! Static user directory backed by an in-memory map.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::task::{domain::UserId, ports::UserDirectory};

/// Directory resolving addresses from a fixed id-to-email map.
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    emails: HashMap<UserId, String>,
}

impl StaticUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an address for `user_id`.
    #[must_use]
    pub fn with_email(mut self, user_id: UserId, email: impl Into<String>) -> Self {
        self.emails.insert(user_id, email.into());
        self
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn email_for(&self, user_id: UserId) -> Option<String> {
        self.emails.get(&user_id).cloned()
    }
}
