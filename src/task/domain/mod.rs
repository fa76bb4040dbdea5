//! Domain model for task lifecycle management.
//!
//! The task domain models task creation, executor assignment, due-date
//! bookkeeping, and the forward-only status progression while keeping all
//! infrastructure concerns outside of the domain boundary.

mod error;
mod ids;
mod principal;
mod task;

pub use error::{TaskConflictError, TaskDomainError};
pub use ids::{TaskId, UserId};
pub use principal::{Principal, Role};
pub use task::{NewTaskData, PersistedTaskData, Task, TaskPriority, TaskStatus, TaskType};
