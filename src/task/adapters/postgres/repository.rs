//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus, TaskType, UserId},
    ports::{TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult, UpdateGuard},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
///
/// Guarded updates are expressed as an UPDATE filtered on the observed
/// status, executor, and due date, so the row-level write either applies
/// atomically or reports a stale read. No explicit transaction is needed
/// for single-task operations.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task, guard: UpdateGuard) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let status = task.status().as_str();
        let executor_id = task.executor_id().map(UserId::into_inner);
        let due_at = task.due_at();
        let assigned_at = task.assigned_at();
        let completed_at = task.completed_at();
        let guard_status = guard.status.as_str();
        let guard_executor = guard.executor_id.map(UserId::into_inner);
        let guard_due = guard.due_at;

        self.run_blocking(move |connection| {
            let changed = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .filter(tasks::status.eq(guard_status))
                    .filter(tasks::executor_id.is_not_distinct_from(guard_executor))
                    .filter(tasks::due_at.is_not_distinct_from(guard_due)),
            )
            .set((
                tasks::status.eq(status),
                tasks::executor_id.eq(executor_id),
                tasks::due_at.eq(due_at),
                tasks::assigned_at.eq(assigned_at),
                tasks::completed_at.eq(completed_at),
            ))
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;

            if changed == 0 {
                let exists: bool = diesel::select(diesel::dsl::exists(
                    tasks::table.filter(tasks::id.eq(task_id.into_inner())),
                ))
                .get_result(connection)
                .map_err(TaskRepositoryError::persistence)?;
                return Err(if exists {
                    TaskRepositoryError::StaleUpdate(task_id)
                } else {
                    TaskRepositoryError::NotFound(task_id)
                });
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if removed == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let criteria = *filter;
        self.run_blocking(move |connection| {
            let mut query = tasks::table.select(TaskRow::as_select()).into_boxed();
            if let Some(author) = criteria.author_id() {
                query = query.filter(tasks::author_id.eq(author.into_inner()));
            }
            if let Some(executor) = criteria.executor_id() {
                query = query.filter(tasks::executor_id.eq(executor.into_inner()));
            }
            if let Some(status) = criteria.status() {
                query = query.filter(tasks::status.eq(status.as_str()));
            }
            if criteria.unassigned_only() {
                query = query.filter(tasks::executor_id.is_null());
            }
            if let Some(from) = criteria.due_from_bound() {
                query = query.filter(tasks::due_at.ge(from));
            }
            if let Some(until) = criteria.due_until_bound() {
                query = query.filter(tasks::due_at.le(until));
            }
            let rows = query
                .order(tasks::requested_at.asc())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        task_type: task.task_type().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        location: task.location().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        author_id: task.author_id().into_inner(),
        executor_id: task.executor_id().map(UserId::into_inner),
        requested_at: task.requested_at(),
        due_at: task.due_at(),
        assigned_at: task.assigned_at(),
        completed_at: task.completed_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        task_type: persisted_type,
        priority: persisted_priority,
        description,
        location,
        status: persisted_status,
        author_id,
        executor_id,
        requested_at,
        due_at,
        assigned_at,
        completed_at,
    } = row;

    let task_type =
        TaskType::try_from(persisted_type.as_str()).map_err(TaskRepositoryError::persistence)?;
    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        task_type,
        priority,
        description,
        location,
        status,
        author_id: UserId::from_uuid(author_id),
        executor_id: executor_id.map(UserId::from_uuid),
        requested_at,
        due_at,
        assigned_at,
        completed_at,
    };
    Ok(Task::from_persisted(data))
}
