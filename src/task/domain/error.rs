//! Error types for task domain validation and lifecycle rules.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or parsing domain task values.
///
/// These correspond to malformed caller input and are surfaced by the
/// lifecycle service as invalid-input failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task type is not one of the closed enumeration.
    #[error("unknown task type: {0}")]
    UnknownTaskType(String),

    /// The priority is not one of the closed enumeration.
    #[error("unknown task priority: {0}")]
    UnknownPriority(String),

    /// The status value is not one of the closed enumeration.
    #[error("unknown task status: {0}")]
    UnknownStatus(String),

    /// The role string is not one of the closed enumeration.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Lifecycle rule violations on well-formed, authorized operations.
///
/// These correspond to business-rule conflicts: the request was valid and
/// permitted, but the task is not in a state that allows it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskConflictError {
    /// The requested status transition is not in the legal progression.
    #[error("invalid status transition for task {task_id}: {from} -> {to}")]
    InvalidStatusTransition {
        /// Identifier of the affected task.
        task_id: TaskId,
        /// Status the task currently holds.
        from: TaskStatus,
        /// Status the caller requested.
        to: TaskStatus,
    },

    /// The due date can no longer be written because work has started.
    #[error("task {task_id} already started ({status}), due date is frozen")]
    TaskAlreadyStarted {
        /// Identifier of the affected task.
        task_id: TaskId,
        /// Status the task currently holds.
        status: TaskStatus,
    },

    /// The task already has an executor; reassignment is not supported.
    #[error("task {0} already has an executor assigned")]
    AlreadyAssigned(TaskId),

    /// A concurrent operation changed the task between read and write.
    #[error("task {0} was modified concurrently, retry the operation")]
    ConcurrentUpdate(TaskId),
}
