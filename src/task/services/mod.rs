//! Orchestration services for the task lifecycle.

mod lifecycle;
mod notifications;

pub use lifecycle::{
    CreateTaskRequest, DueWindow, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
};
pub use notifications::{NotificationTemplates, RenderedNotification};
