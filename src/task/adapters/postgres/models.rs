//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Short human-readable title.
    pub title: String,
    /// Service category.
    pub task_type: String,
    /// Urgency.
    pub priority: String,
    /// Optional free-text details.
    pub description: Option<String>,
    /// Optional work location.
    pub location: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Requesting principal.
    pub author_id: uuid::Uuid,
    /// Assigned executor, if any.
    pub executor_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub requested_at: DateTime<Utc>,
    /// Optional deadline.
    pub due_at: Option<DateTime<Utc>>,
    /// Assignment timestamp, if assigned.
    pub assigned_at: Option<DateTime<Utc>>,
    /// Completion timestamp, if finalized.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Short human-readable title.
    pub title: String,
    /// Service category.
    pub task_type: String,
    /// Urgency.
    pub priority: String,
    /// Optional free-text details.
    pub description: Option<String>,
    /// Optional work location.
    pub location: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Requesting principal.
    pub author_id: uuid::Uuid,
    /// Assigned executor, if any.
    pub executor_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub requested_at: DateTime<Utc>,
    /// Optional deadline.
    pub due_at: Option<DateTime<Utc>>,
    /// Assignment timestamp, if assigned.
    pub assigned_at: Option<DateTime<Utc>>,
    /// Completion timestamp, if finalized.
    pub completed_at: Option<DateTime<Utc>>,
}
