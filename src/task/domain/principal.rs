//! Authenticated principal and the role-based permission matrix.

use super::{Task, TaskDomainError, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role held by an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Originates tasks ("solicitante").
    Requester,
    /// Performs assigned tasks ("SG", servicios generales).
    Executor,
    /// Assigns work, changes any task, deletes tasks.
    Admin,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Requester => "requester",
            Self::Executor => "executor",
            Self::Admin => "admin",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "requester" | "solicitante" => Ok(Self::Requester),
            "executor" | "sg" => Ok(Self::Executor),
            "admin" => Ok(Self::Admin),
            _ => Err(TaskDomainError::UnknownRole(value.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated actor performing a lifecycle operation.
///
/// Produced by the out-of-scope authentication layer (token verification plus
/// active-user check) and treated as trusted input here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: UserId,
    role: Role,
    area: String,
    email: Option<String>,
}

impl Principal {
    /// Creates a principal with the given identity, role, and area.
    #[must_use]
    pub fn new(id: UserId, role: Role, area: impl Into<String>) -> Self {
        Self {
            id,
            role,
            area: area.into(),
            email: None,
        }
    }

    /// Sets the principal's notification address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Returns the principal's user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the principal's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the principal's organizational area.
    #[must_use]
    pub fn area(&self) -> &str {
        &self.area
    }

    /// Returns the principal's notification address, if known.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Whether the principal holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

// Permission matrix. Every lifecycle operation checks exactly one predicate
// here, so the role rules stay auditable in one place.
impl Principal {
    /// Whether the principal may create tasks.
    #[must_use]
    pub const fn may_create_tasks(&self) -> bool {
        matches!(self.role, Role::Requester | Role::Admin)
    }

    /// Whether the principal may set the due date of `task`.
    ///
    /// Admins may due-date any task; requesters only their own.
    #[must_use]
    pub fn may_set_due_date(&self, task: &Task) -> bool {
        self.is_admin() || task.author_id() == self.id
    }

    /// Whether the principal may assign executors.
    #[must_use]
    pub const fn may_assign(&self) -> bool {
        self.is_admin()
    }

    /// Whether the principal may change the status of `task`.
    ///
    /// Admins may advance any task; executors only tasks assigned to them.
    #[must_use]
    pub fn may_change_status(&self, task: &Task) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Executor => task.executor_id() == Some(self.id),
            Role::Requester => false,
        }
    }

    /// Whether the principal may delete tasks.
    #[must_use]
    pub const fn may_delete_tasks(&self) -> bool {
        self.is_admin()
    }

    /// Whether the principal may list tasks they authored.
    #[must_use]
    pub const fn may_list_authored(&self) -> bool {
        matches!(self.role, Role::Requester | Role::Admin)
    }

    /// Whether the principal may list tasks assigned to them.
    #[must_use]
    pub const fn may_list_assigned(&self) -> bool {
        matches!(self.role, Role::Executor)
    }

    /// Whether the principal may list every task, including unassigned ones.
    #[must_use]
    pub const fn may_list_all(&self) -> bool {
        self.is_admin()
    }

    /// Whether the principal may consult the due-date calendar.
    ///
    /// Executors see their own assignments; admins see everything.
    #[must_use]
    pub const fn may_view_calendar(&self) -> bool {
        matches!(self.role, Role::Executor | Role::Admin)
    }
}
