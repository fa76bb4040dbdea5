//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use vidacel::task::{
    adapters::memory::{InMemoryTaskRepository, RecordingNotifier, StaticUserDirectory},
    domain::{Principal, Role, Task, UserId},
    services::{CreateTaskRequest, TaskLifecycleService},
};

/// Admin mailbox used across the integration suite.
pub const ADMIN_MAILBOX: &str = "tareas@vidacel.cl";

/// Service type assembled from the in-memory adapters.
pub type TestService = TaskLifecycleService<
    InMemoryTaskRepository,
    RecordingNotifier,
    StaticUserDirectory,
    DefaultClock,
>;

/// A fully wired lifecycle service plus the principals acting on it.
pub struct World {
    /// Lifecycle service under test.
    pub service: TestService,
    /// Direct handle on the backing repository.
    pub repository: Arc<InMemoryTaskRepository>,
    /// Captured outbound notifications.
    pub notifier: Arc<RecordingNotifier>,
    /// Administrator principal.
    pub admin: Principal,
    /// Requesting principal.
    pub requester: Principal,
    /// Executor principal.
    pub executor: Principal,
}

/// Provides a fresh world for each test.
#[fixture]
pub fn world() -> World {
    let admin =
        Principal::new(UserId::new(), Role::Admin, "Administración").with_email("admin@vidacel.cl");
    let requester =
        Principal::new(UserId::new(), Role::Requester, "Comercial").with_email("ana@vidacel.cl");
    let executor = Principal::new(UserId::new(), Role::Executor, "SG").with_email("sg@vidacel.cl");

    let directory = StaticUserDirectory::new()
        .with_email(requester.id(), "ana@vidacel.cl")
        .with_email(executor.id(), "sg@vidacel.cl");
    let repository = Arc::new(InMemoryTaskRepository::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let service = TaskLifecycleService::new(
        Arc::clone(&repository),
        Arc::clone(&notifier),
        Arc::new(directory),
        Arc::new(DefaultClock),
        ADMIN_MAILBOX,
    );
    World {
        service,
        repository,
        notifier,
        admin,
        requester,
        executor,
    }
}

/// Creates a pending task authored by the world's requester.
pub async fn create_pending(world: &World, title: &str) -> Task {
    world
        .service
        .create_task(&world.requester, CreateTaskRequest::new(title, "Varios"))
        .await
        .expect("task creation should succeed")
}
