//! Service layer orchestrating task lifecycle operations.
//!
//! Every operation takes the acting [`Principal`] plus operation-specific
//! input, authorizes it against the permission matrix, applies the mutation
//! through the repository port, and returns the full updated task or a typed
//! failure. Notifications are dispatched after the state change on a
//! fire-and-forget basis; their failure never affects the lifecycle result.

use super::notifications::NotificationTemplates;
use crate::task::{
    domain::{
        NewTaskData, Principal, Task, TaskConflictError, TaskDomainError, TaskId, TaskPriority,
        TaskStatus, TaskType, UserId,
    },
    ports::{
        Notifier, OutboundMessage, TaskFilter, TaskRepository, TaskRepositoryError, UpdateGuard,
        UserDirectory,
    },
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
///
/// `task_type` and `priority` arrive as raw strings from the transport layer
/// and are parsed against the closed enumerations here, so out-of-set values
/// surface as invalid input before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    task_type: String,
    priority: Option<String>,
    description: Option<String>,
    location: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, task_type: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            task_type: task_type.into(),
            priority: None,
            description: None,
            location: None,
        }
    }

    /// Sets the task priority. Omitted priority defaults to `Media`.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the work location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Optional due-date bounds for calendar listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DueWindow {
    from: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
}

impl DueWindow {
    /// Creates an unbounded window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the inclusive lower bound.
    #[must_use]
    pub const fn since(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    /// Sets the inclusive upper bound.
    #[must_use]
    pub const fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }
}

/// Failures surfaced by lifecycle operations.
///
/// Kinds are distinct and inspectable; the transport layer maps each to its
/// own response code. Infrastructure faults pass through unmodified in
/// [`TaskLifecycleError::Repository`].
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The principal's role or relationship to the task does not permit the
    /// operation.
    #[error("principal {principal} may not {operation}")]
    Forbidden {
        /// Identifier of the acting principal.
        principal: UserId,
        /// Short description of the rejected operation.
        operation: &'static str,
    },

    /// Malformed or out-of-enumeration input.
    #[error(transparent)]
    InvalidInput(#[from] TaskDomainError),

    /// Well-formed, authorized operation that violates a lifecycle rule.
    #[error(transparent)]
    Conflict(#[from] TaskConflictError),

    /// Repository infrastructure failure.
    #[error(transparent)]
    Repository(TaskRepositoryError),
}

impl From<TaskRepositoryError> for TaskLifecycleError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            TaskRepositoryError::StaleUpdate(id) => {
                Self::Conflict(TaskConflictError::ConcurrentUpdate(id))
            }
            other => Self::Repository(other),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Notification-worthy lifecycle events, resolved and delivered off the
/// request path.
enum LifecycleEvent {
    Created { task: Task, author: Principal },
    Assigned { task: Task, executor_id: UserId },
    StatusChanged { task: Task },
}

/// Task lifecycle orchestration service.
///
/// Stateless between calls; all shared state lives behind the repository.
#[derive(Clone)]
pub struct TaskLifecycleService<R, N, D, C>
where
    R: TaskRepository,
    N: Notifier + 'static,
    D: UserDirectory + 'static,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    notifier: Arc<N>,
    directory: Arc<D>,
    clock: Arc<C>,
    templates: Arc<NotificationTemplates>,
    admin_mailbox: String,
}

impl<R, N, D, C> TaskLifecycleService<R, N, D, C>
where
    R: TaskRepository,
    N: Notifier + 'static,
    D: UserDirectory + 'static,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    ///
    /// `admin_mailbox` receives a copy of every lifecycle notification.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        notifier: Arc<N>,
        directory: Arc<D>,
        clock: Arc<C>,
        admin_mailbox: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            notifier,
            directory,
            clock,
            templates: Arc::new(NotificationTemplates::new()),
            admin_mailbox: admin_mailbox.into(),
        }
    }

    /// Creates a new pending task authored by the principal.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Forbidden`] unless the principal is a
    /// requester or admin, [`TaskLifecycleError::InvalidInput`] for an empty
    /// title or out-of-enumeration type/priority, or a repository error.
    pub async fn create_task(
        &self,
        principal: &Principal,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        if !principal.may_create_tasks() {
            return Err(forbidden(principal, "create tasks"));
        }

        let task_type = TaskType::try_from(request.task_type.as_str())?;
        let priority = match request.priority.as_deref() {
            Some(raw) => TaskPriority::try_from(raw)?,
            None => TaskPriority::default(),
        };

        let task = Task::new(
            NewTaskData {
                author_id: principal.id(),
                title: request.title,
                task_type,
                priority,
                description: request.description,
                location: request.location,
            },
            &*self.clock,
        )?;
        self.repository.store(&task).await?;

        self.publish(LifecycleEvent::Created {
            task: task.clone(),
            author: principal.clone(),
        });
        Ok(task)
    }

    /// Sets the due date of a still-pending task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown task,
    /// [`TaskLifecycleError::Forbidden`] unless the principal is an admin or
    /// the task's author, or [`TaskLifecycleError::Conflict`] once the task
    /// has left `Pendiente`.
    pub async fn set_due_date(
        &self,
        principal: &Principal,
        task_id: TaskId,
        due_at: DateTime<Utc>,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        if !principal.may_set_due_date(&task) {
            return Err(forbidden(principal, "set the due date of this task"));
        }

        let guard = UpdateGuard::from_task(&task);
        task.set_due_date(due_at)?;
        self.repository.update(&task, guard).await?;
        Ok(task)
    }

    /// Assigns an executor to a task, stamping the assignment time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Forbidden`] for non-admin principals,
    /// [`TaskLifecycleError::NotFound`] for an unknown task, or
    /// [`TaskLifecycleError::Conflict`] when an executor is already assigned.
    pub async fn assign(
        &self,
        principal: &Principal,
        task_id: TaskId,
        executor_id: UserId,
    ) -> TaskLifecycleResult<Task> {
        if !principal.may_assign() {
            return Err(forbidden(principal, "assign executors"));
        }
        let mut task = self.load(task_id).await?;

        let guard = UpdateGuard::from_task(&task);
        task.assign_executor(executor_id, &*self.clock)?;
        self.repository.update(&task, guard).await?;

        self.publish(LifecycleEvent::Assigned {
            task: task.clone(),
            executor_id,
        });
        Ok(task)
    }

    /// Advances a task's status, stamping `completed_at` on finalization.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::InvalidInput`] for an unrecognized
    /// status value, [`TaskLifecycleError::NotFound`] for an unknown task,
    /// [`TaskLifecycleError::Forbidden`] unless the principal is an admin or
    /// the task's assigned executor, or [`TaskLifecycleError::Conflict`] for
    /// a move outside the forward progression.
    pub async fn change_status(
        &self,
        principal: &Principal,
        task_id: TaskId,
        next_status: &str,
    ) -> TaskLifecycleResult<Task> {
        let next = TaskStatus::try_from(next_status)?;
        let mut task = self.load(task_id).await?;
        if !principal.may_change_status(&task) {
            return Err(forbidden(principal, "change the status of this task"));
        }

        let guard = UpdateGuard::from_task(&task);
        task.advance_to(next, &*self.clock)?;
        self.repository.update(&task, guard).await?;

        self.publish(LifecycleEvent::StatusChanged { task: task.clone() });
        Ok(task)
    }

    /// Permanently deletes a task. There is no archival.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Forbidden`] for non-admin principals or
    /// [`TaskLifecycleError::NotFound`] for an unknown task.
    pub async fn delete_task(
        &self,
        principal: &Principal,
        task_id: TaskId,
    ) -> TaskLifecycleResult<()> {
        if !principal.may_delete_tasks() {
            return Err(forbidden(principal, "delete tasks"));
        }
        self.repository.delete(task_id).await?;
        Ok(())
    }

    /// Lists tasks authored by the principal.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Forbidden`] for executors, or a
    /// repository error.
    pub async fn tasks_authored_by(&self, principal: &Principal) -> TaskLifecycleResult<Vec<Task>> {
        if !principal.may_list_authored() {
            return Err(forbidden(principal, "list authored tasks"));
        }
        let filter = TaskFilter::new().authored_by(principal.id());
        Ok(self.repository.list(&filter).await?)
    }

    /// Lists tasks assigned to the principal.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Forbidden`] unless the principal is an
    /// executor, or a repository error.
    pub async fn tasks_assigned_to(&self, principal: &Principal) -> TaskLifecycleResult<Vec<Task>> {
        if !principal.may_list_assigned() {
            return Err(forbidden(principal, "list assigned tasks"));
        }
        let filter = TaskFilter::new().assigned_to(principal.id());
        Ok(self.repository.list(&filter).await?)
    }

    /// Lists every task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Forbidden`] for non-admin principals, or
    /// a repository error.
    pub async fn all_tasks(&self, principal: &Principal) -> TaskLifecycleResult<Vec<Task>> {
        if !principal.may_list_all() {
            return Err(forbidden(principal, "list all tasks"));
        }
        Ok(self.repository.list(&TaskFilter::new()).await?)
    }

    /// Lists pending tasks with no executor.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Forbidden`] for non-admin principals, or
    /// a repository error.
    pub async fn unassigned_tasks(&self, principal: &Principal) -> TaskLifecycleResult<Vec<Task>> {
        if !principal.may_list_all() {
            return Err(forbidden(principal, "list unassigned tasks"));
        }
        let filter = TaskFilter::new()
            .with_status(TaskStatus::Pendiente)
            .unassigned();
        Ok(self.repository.list(&filter).await?)
    }

    /// Lists tasks whose due date falls in `window`.
    ///
    /// Executors see only their own assignments; admins see every task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Forbidden`] for requesters, or a
    /// repository error.
    pub async fn due_calendar(
        &self,
        principal: &Principal,
        window: DueWindow,
    ) -> TaskLifecycleResult<Vec<Task>> {
        if !principal.may_view_calendar() {
            return Err(forbidden(principal, "view the due-date calendar"));
        }
        let mut filter = TaskFilter::new();
        if let Some(from) = window.from {
            filter = filter.due_from(from);
        }
        if let Some(until) = window.until {
            filter = filter.due_until(until);
        }
        if !principal.is_admin() {
            filter = filter.assigned_to(principal.id());
        }
        Ok(self.repository.list(&filter).await?)
    }

    async fn load(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))
    }

    /// Dispatches a notification off the request path. Delivery failures are
    /// logged and never surface to the caller.
    fn publish(&self, event: LifecycleEvent) {
        let templates = Arc::clone(&self.templates);
        let notifier = Arc::clone(&self.notifier);
        let directory = Arc::clone(&self.directory);
        let admin_mailbox = self.admin_mailbox.clone();
        drop(tokio::spawn(async move {
            let Some(message) =
                build_message(&templates, &*directory, &admin_mailbox, event).await
            else {
                return;
            };
            if let Err(err) = notifier.deliver(message).await {
                tracing::warn!(error = %err, "notification delivery failed");
            }
        }));
    }
}

const fn forbidden(principal: &Principal, operation: &'static str) -> TaskLifecycleError {
    TaskLifecycleError::Forbidden {
        principal: principal.id(),
        operation,
    }
}

async fn build_message<D: UserDirectory + ?Sized>(
    templates: &NotificationTemplates,
    directory: &D,
    admin_mailbox: &str,
    event: LifecycleEvent,
) -> Option<OutboundMessage> {
    let (rendered, mut recipients) = match event {
        LifecycleEvent::Created { task, author } => {
            let rendered = render_or_log(templates.task_created(&task, &author))?;
            let author_email = match author.email() {
                Some(email) => Some(email.to_owned()),
                None => directory.email_for(author.id()).await,
            };
            (rendered, author_email.into_iter().collect::<Vec<_>>())
        }
        LifecycleEvent::Assigned { task, executor_id } => {
            let executor_email = directory.email_for(executor_id).await;
            let executor_display = executor_email
                .clone()
                .unwrap_or_else(|| executor_id.to_string());
            let rendered = render_or_log(templates.task_assigned(&task, &executor_display))?;
            let author_email = directory.email_for(task.author_id()).await;
            let recipients = executor_email
                .into_iter()
                .chain(author_email)
                .collect::<Vec<_>>();
            (rendered, recipients)
        }
        LifecycleEvent::StatusChanged { task } => {
            let rendered = render_or_log(templates.status_changed(&task))?;
            let author_email = directory.email_for(task.author_id()).await;
            (rendered, author_email.into_iter().collect::<Vec<_>>())
        }
    };
    recipients.push(admin_mailbox.to_owned());
    Some(OutboundMessage::new(
        recipients,
        rendered.subject,
        rendered.body,
    ))
}

fn render_or_log(
    result: Result<super::RenderedNotification, minijinja::Error>,
) -> Option<super::RenderedNotification> {
    match result {
        Ok(rendered) => Some(rendered),
        Err(err) => {
            tracing::warn!(error = %err, "notification template rendering failed");
            None
        }
    }
}
