//! Rendering of outbound notification subjects and bodies.
//!
//! Wording mirrors the mail the surrounding system has always sent; the
//! delivery channel itself lives behind [`crate::task::ports::Notifier`].

use crate::task::domain::{Principal, Task};
use minijinja::{Environment, context};

const TASK_CREATED_SUBJECT: &str = "Nueva tarea: {{ title }}";
const TASK_CREATED_BODY: &str = "Se ha creado la tarea {{ title }} por {{ author }} ({{ area }}). \
     Prioridad: {{ priority }} - Límite: {{ due_at }}";

const TASK_ASSIGNED_SUBJECT: &str = "Tarea asignada: {{ title }}";
const TASK_ASSIGNED_BODY: &str = "La tarea {{ title }} ha sido asignada a {{ executor }}.";

const STATUS_CHANGED_SUBJECT: &str = "Estado actualizado a {{ status }}: {{ title }}";
const STATUS_CHANGED_BODY: &str = "La tarea {{ title }} ahora está en estado {{ status }}.";

/// A rendered subject/body pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotification {
    /// Message subject line.
    pub subject: String,
    /// Message body text.
    pub body: String,
}

/// Template renderer for lifecycle notifications.
#[derive(Debug, Clone)]
pub struct NotificationTemplates {
    env: Environment<'static>,
}

impl NotificationTemplates {
    /// Creates the template renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Renders the task-created notification.
    ///
    /// # Errors
    ///
    /// Returns a template error when rendering fails.
    pub fn task_created(
        &self,
        task: &Task,
        author: &Principal,
    ) -> Result<RenderedNotification, minijinja::Error> {
        let author_display = author
            .email()
            .map_or_else(|| author.id().to_string(), str::to_owned);
        let due_display = task
            .due_at()
            .map_or_else(|| "Sin fecha".to_owned(), |due| due.to_rfc3339());
        Ok(RenderedNotification {
            subject: self
                .env
                .render_str(TASK_CREATED_SUBJECT, context! { title => task.title() })?,
            body: self.env.render_str(
                TASK_CREATED_BODY,
                context! {
                    title => task.title(),
                    author => author_display,
                    area => author.area(),
                    priority => task.priority().as_str(),
                    due_at => due_display,
                },
            )?,
        })
    }

    /// Renders the task-assigned notification.
    ///
    /// # Errors
    ///
    /// Returns a template error when rendering fails.
    pub fn task_assigned(
        &self,
        task: &Task,
        executor: &str,
    ) -> Result<RenderedNotification, minijinja::Error> {
        Ok(RenderedNotification {
            subject: self
                .env
                .render_str(TASK_ASSIGNED_SUBJECT, context! { title => task.title() })?,
            body: self.env.render_str(
                TASK_ASSIGNED_BODY,
                context! { title => task.title(), executor => executor },
            )?,
        })
    }

    /// Renders the status-changed notification.
    ///
    /// # Errors
    ///
    /// Returns a template error when rendering fails.
    pub fn status_changed(&self, task: &Task) -> Result<RenderedNotification, minijinja::Error> {
        let ctx = context! {
            title => task.title(),
            status => task.status().as_str(),
        };
        Ok(RenderedNotification {
            subject: self.env.render_str(STATUS_CHANGED_SUBJECT, ctx.clone())?,
            body: self.env.render_str(STATUS_CHANGED_BODY, ctx)?,
        })
    }
}

impl Default for NotificationTemplates {
    fn default() -> Self {
        Self::new()
    }
}
