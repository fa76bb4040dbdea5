//! Port contracts the task lifecycle core depends on.

mod directory;
mod notifier;
mod repository;

pub use directory::UserDirectory;
pub use notifier::{Notifier, NotifierError, OutboundMessage};
pub use repository::{
    TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult, UpdateGuard,
};
