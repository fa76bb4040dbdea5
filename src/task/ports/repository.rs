//! Repository port for task persistence, lookup, and filtered listing.

use crate::task::domain::{Task, TaskId, TaskStatus, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Observed task state used for optimistic concurrency on updates.
///
/// The guard captures every field a lifecycle operation can write: `status`,
/// `executor_id`, and `due_at`. An update only applies while the stored
/// record still matches all three, so a writer that raced any committed
/// mutation, including a due-date change, gets `StaleUpdate` instead of
/// silently reverting it with its whole-record write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateGuard {
    /// Status observed when the task was read.
    pub status: TaskStatus,
    /// Executor observed when the task was read.
    pub executor_id: Option<UserId>,
    /// Due date observed when the task was read.
    pub due_at: Option<DateTime<Utc>>,
}

impl UpdateGuard {
    /// Captures the guard fields from a freshly read task.
    #[must_use]
    pub const fn from_task(task: &Task) -> Self {
        Self {
            status: task.status(),
            executor_id: task.executor_id(),
            due_at: task.due_at(),
        }
    }
}

/// Filter for listing task records.
///
/// All criteria are conjunctive; the default filter matches every task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    author_id: Option<UserId>,
    executor_id: Option<UserId>,
    status: Option<TaskStatus>,
    unassigned_only: bool,
    due_from: Option<DateTime<Utc>>,
    due_until: Option<DateTime<Utc>>,
}

impl TaskFilter {
    /// Creates a filter matching every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to tasks authored by `author_id`.
    #[must_use]
    pub const fn authored_by(mut self, author_id: UserId) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Restricts results to tasks assigned to `executor_id`.
    #[must_use]
    pub const fn assigned_to(mut self, executor_id: UserId) -> Self {
        self.executor_id = Some(executor_id);
        self
    }

    /// Restricts results to tasks in `status`.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts results to tasks with no executor.
    #[must_use]
    pub const fn unassigned(mut self) -> Self {
        self.unassigned_only = true;
        self
    }

    /// Restricts results to tasks due at or after `from`.
    #[must_use]
    pub const fn due_from(mut self, from: DateTime<Utc>) -> Self {
        self.due_from = Some(from);
        self
    }

    /// Restricts results to tasks due at or before `until`.
    #[must_use]
    pub const fn due_until(mut self, until: DateTime<Utc>) -> Self {
        self.due_until = Some(until);
        self
    }

    /// Returns the author restriction, if any.
    #[must_use]
    pub const fn author_id(&self) -> Option<UserId> {
        self.author_id
    }

    /// Returns the executor restriction, if any.
    #[must_use]
    pub const fn executor_id(&self) -> Option<UserId> {
        self.executor_id
    }

    /// Returns the status restriction, if any.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Whether results are restricted to unassigned tasks.
    #[must_use]
    pub const fn unassigned_only(&self) -> bool {
        self.unassigned_only
    }

    /// Returns the lower due-date bound, if any.
    #[must_use]
    pub const fn due_from_bound(&self) -> Option<DateTime<Utc>> {
        self.due_from
    }

    /// Returns the upper due-date bound, if any.
    #[must_use]
    pub const fn due_until_bound(&self) -> Option<DateTime<Utc>> {
        self.due_until
    }

    /// Whether `task` satisfies every criterion of this filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if self.author_id.is_some_and(|id| task.author_id() != id) {
            return false;
        }
        if self
            .executor_id
            .is_some_and(|id| task.executor_id() != Some(id))
        {
            return false;
        }
        if self.status.is_some_and(|status| task.status() != status) {
            return false;
        }
        if self.unassigned_only && task.executor_id().is_some() {
            return false;
        }
        let due = task.due_at();
        if self.due_from.is_some() || self.due_until.is_some() {
            let Some(due_at) = due else { return false };
            if self.due_from.is_some_and(|from| due_at < from) {
                return false;
            }
            if self.due_until.is_some_and(|until| due_at > until) {
                return false;
            }
        }
        true
    }
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists the whole task record, guarded by the state observed at read
    /// time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist, or [`TaskRepositoryError::StaleUpdate`] when the stored record
    /// no longer matches `guard`.
    async fn update(&self, task: &Task, guard: UpdateGuard) -> TaskRepositoryResult<()>;

    /// Permanently removes a task. There is no archival.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns all tasks matching `filter`.
    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored record diverged from the update guard.
    #[error("stale update for task {0}")]
    StaleUpdate(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
