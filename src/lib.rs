//! Vidacel: task-assignment lifecycle core.
//!
//! This crate owns the task lifecycle rules of the Vidacel task manager:
//! requesters raise service tasks, administrators assign them to executors
//! ("SG"), and executors advance each task through its status progression.
//! The surrounding web layer authenticates requests into a
//! [`task::domain::Principal`] and calls into the lifecycle service;
//! everything HTTP-shaped lives outside this crate.
//!
//! # Architecture
//!
//! Vidacel follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, mail, etc.)
//!
//! # Modules
//!
//! - [`task`]: Task creation, assignment, and lifecycle tracking

pub mod task;
