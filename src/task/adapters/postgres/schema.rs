//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records with lifecycle and assignment bookkeeping.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Short human-readable title.
        #[max_length = 255]
        title -> Varchar,
        /// Service category.
        #[max_length = 50]
        task_type -> Varchar,
        /// Urgency.
        #[max_length = 50]
        priority -> Varchar,
        /// Optional free-text details.
        description -> Nullable<Text>,
        /// Optional work location.
        #[max_length = 255]
        location -> Nullable<Varchar>,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Requesting principal.
        author_id -> Uuid,
        /// Assigned executor, if any.
        executor_id -> Nullable<Uuid>,
        /// Creation timestamp.
        requested_at -> Timestamptz,
        /// Optional deadline.
        due_at -> Nullable<Timestamptz>,
        /// Assignment timestamp, if assigned.
        assigned_at -> Nullable<Timestamptz>,
        /// Completion timestamp, if finalized.
        completed_at -> Nullable<Timestamptz>,
    }
}
