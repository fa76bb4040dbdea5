//! `PostgreSQL` persistence adapter for task records.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresTaskRepository, TaskPgPool};
