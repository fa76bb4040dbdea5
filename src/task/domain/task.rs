//! Task aggregate root and related task lifecycle types.

use super::{TaskConflictError, TaskDomainError, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// Status only ever moves forward through
/// `Pendiente -> En Progreso -> Finalizada`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Task has been requested but work has not started.
    #[serde(rename = "Pendiente")]
    Pendiente,
    /// Task is being worked on by its executor.
    #[serde(rename = "En Progreso")]
    EnProgreso,
    /// Task work is complete.
    #[serde(rename = "Finalizada")]
    Finalizada,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pendiente => "Pendiente",
            Self::EnProgreso => "En Progreso",
            Self::Finalizada => "Finalizada",
        }
    }

    /// Whether the progression from `self` to `next` is legal.
    ///
    /// Only the two forward steps are permitted; same-state, backward, and
    /// skipping moves are all rejected.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pendiente, Self::EnProgreso) | (Self::EnProgreso, Self::Finalizada)
        )
    }

    /// Whether no further transition leaves this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finalizada)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pendiente" => Ok(Self::Pendiente),
            "en progreso" => Ok(Self::EnProgreso),
            "finalizada" => Ok(Self::Finalizada),
            _ => Err(TaskDomainError::UnknownStatus(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service category of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    /// Waste or equipment retrieval.
    Retiro,
    /// Transport between sites.
    Traslados,
    /// Purchasing errands.
    Compras,
    /// Anything that fits no other category.
    Varios,
}

impl TaskType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Retiro => "Retiro",
            Self::Traslados => "Traslados",
            Self::Compras => "Compras",
            Self::Varios => "Varios",
        }
    }
}

impl TryFrom<&str> for TaskType {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "retiro" => Ok(Self::Retiro),
            "traslados" => Ok(Self::Traslados),
            "compras" => Ok(Self::Compras),
            "varios" => Ok(Self::Varios),
            _ => Err(TaskDomainError::UnknownTaskType(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    /// Urgent work.
    Alta,
    /// Normal work. This is the default when a request omits priority.
    #[default]
    Media,
    /// Low-urgency work.
    Baja,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alta => "Alta",
            Self::Media => "Media",
            Self::Baja => "Baja",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "alta" => Ok(Self::Alta),
            "media" => Ok(Self::Media),
            "baja" => Ok(Self::Baja),
            _ => Err(TaskDomainError::UnknownPriority(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated input for creating a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Principal who requested the task.
    pub author_id: UserId,
    /// Short human-readable title.
    pub title: String,
    /// Service category.
    pub task_type: TaskType,
    /// Urgency, defaulting to [`TaskPriority::Media`].
    pub priority: TaskPriority,
    /// Optional free-text details.
    pub description: Option<String>,
    /// Optional location the work happens at.
    pub location: Option<String>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted service category.
    pub task_type: TaskType,
    /// Persisted urgency.
    pub priority: TaskPriority,
    /// Persisted free-text details, if any.
    pub description: Option<String>,
    /// Persisted location, if any.
    pub location: Option<String>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted author identifier.
    pub author_id: UserId,
    /// Persisted executor identifier, if assigned.
    pub executor_id: Option<UserId>,
    /// Persisted creation timestamp.
    pub requested_at: DateTime<Utc>,
    /// Persisted deadline, if set.
    pub due_at: Option<DateTime<Utc>>,
    /// Persisted assignment timestamp, if assigned.
    pub assigned_at: Option<DateTime<Utc>>,
    /// Persisted completion timestamp, if finalized.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Task aggregate root.
///
/// All mutation goes through the lifecycle methods below, which uphold:
///
/// - `completed_at` is set iff status is [`TaskStatus::Finalizada`]
/// - `assigned_at` is set iff `executor_id` is set
/// - `due_at` is writable only while [`TaskStatus::Pendiente`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    task_type: TaskType,
    priority: TaskPriority,
    description: Option<String>,
    location: Option<String>,
    status: TaskStatus,
    author_id: UserId,
    executor_id: Option<UserId>,
    requested_at: DateTime<Utc>,
    due_at: Option<DateTime<Utc>>,
    assigned_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new pending task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is empty after
    /// trimming.
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let title = data.title.trim().to_owned();
        if title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }

        Ok(Self {
            id: TaskId::new(),
            title,
            task_type: data.task_type,
            priority: data.priority,
            description: data.description,
            location: data.location,
            status: TaskStatus::Pendiente,
            author_id: data.author_id,
            executor_id: None,
            requested_at: clock.utc(),
            due_at: None,
            assigned_at: None,
            completed_at: None,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        debug_assert!(
            data.completed_at.is_some() == (data.status == TaskStatus::Finalizada),
            "persisted completed_at must match finalized status"
        );
        debug_assert!(
            data.assigned_at.is_some() == data.executor_id.is_some(),
            "persisted assigned_at must match executor presence"
        );
        Self {
            id: data.id,
            title: data.title,
            task_type: data.task_type,
            priority: data.priority,
            description: data.description,
            location: data.location,
            status: data.status,
            author_id: data.author_id,
            executor_id: data.executor_id,
            requested_at: data.requested_at,
            due_at: data.due_at,
            assigned_at: data.assigned_at,
            completed_at: data.completed_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the service category.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns the urgency.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the free-text details, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the work location, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the identifier of the requesting principal.
    #[must_use]
    pub const fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Returns the assigned executor, if any.
    #[must_use]
    pub const fn executor_id(&self) -> Option<UserId> {
        self.executor_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    /// Returns the deadline, if set.
    #[must_use]
    pub const fn due_at(&self) -> Option<DateTime<Utc>> {
        self.due_at
    }

    /// Returns the assignment timestamp, if assigned.
    #[must_use]
    pub const fn assigned_at(&self) -> Option<DateTime<Utc>> {
        self.assigned_at
    }

    /// Returns the completion timestamp, if finalized.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Sets the deadline.
    ///
    /// # Errors
    ///
    /// Returns [`TaskConflictError::TaskAlreadyStarted`] once the task has
    /// left [`TaskStatus::Pendiente`]; the due date is frozen from then on.
    pub fn set_due_date(&mut self, due_at: DateTime<Utc>) -> Result<(), TaskConflictError> {
        if self.status != TaskStatus::Pendiente {
            return Err(TaskConflictError::TaskAlreadyStarted {
                task_id: self.id,
                status: self.status,
            });
        }
        self.due_at = Some(due_at);
        Ok(())
    }

    /// Assigns an executor and stamps the assignment time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskConflictError::AlreadyAssigned`] when an executor is
    /// already set; reassignment is not a supported operation.
    pub fn assign_executor(
        &mut self,
        executor_id: UserId,
        clock: &impl Clock,
    ) -> Result<(), TaskConflictError> {
        if self.executor_id.is_some() {
            return Err(TaskConflictError::AlreadyAssigned(self.id));
        }
        self.executor_id = Some(executor_id);
        self.assigned_at = Some(clock.utc());
        Ok(())
    }

    /// Advances the lifecycle status, stamping `completed_at` on
    /// finalization.
    ///
    /// # Errors
    ///
    /// Returns [`TaskConflictError::InvalidStatusTransition`] for any move
    /// outside the forward progression.
    pub fn advance_to(
        &mut self,
        next: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskConflictError> {
        if !self.status.can_transition_to(next) {
            return Err(TaskConflictError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        if next == TaskStatus::Finalizada {
            self.completed_at = Some(clock.utc());
        }
        Ok(())
    }
}
