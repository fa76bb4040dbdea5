//! In-memory adapters for tests and lightweight embedding.

mod directory;
mod notifier;
mod task;

pub use directory::StaticUserDirectory;
pub use notifier::RecordingNotifier;
pub use task::InMemoryTaskRepository;
