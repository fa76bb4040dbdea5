//! Task lifecycle management for Vidacel.
//!
//! This module implements the task-assignment core: creating service tasks on
//! behalf of requesters, due-dating them while still pending, assigning them
//! to executors, enforcing validated status transitions, and removing them.
//! Authorization is expressed as an explicit permission matrix over the
//! acting principal and the affected task. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
