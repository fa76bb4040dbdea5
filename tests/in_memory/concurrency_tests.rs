//! Guarded-update behaviour of the in-memory repository.

use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::rstest;
use vidacel::task::{
    domain::{TaskId, TaskStatus, UserId},
    ports::{TaskRepository, TaskRepositoryError, UpdateGuard},
};

use super::helpers::{World, create_pending, world};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_writer_with_stale_guard_is_rejected(world: World) {
    let clock = DefaultClock;
    let stored = create_pending(&world, "Traslado de muestras").await;

    // Two writers read the same snapshot.
    let guard = UpdateGuard::from_task(&stored);
    let mut first = stored.clone();
    let mut second = stored;

    first
        .assign_executor(world.executor.id(), &clock)
        .expect("assignment should succeed");
    world
        .repository
        .update(&first, guard)
        .await
        .expect("first writer should win");

    second
        .assign_executor(UserId::new(), &clock)
        .expect("assignment should succeed");
    let result = world.repository.update(&second, guard).await;
    assert!(matches!(result, Err(TaskRepositoryError::StaleUpdate(_))));

    // The first writer's executor survives.
    let current = world
        .repository
        .find_by_id(first.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(current.executor_id(), Some(world.executor.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn committed_due_date_survives_a_racing_assignment(world: World) {
    let clock = DefaultClock;
    let stored = create_pending(&world, "Retiro con plazo").await;
    let due = Utc::now() + Duration::days(2);

    // Both writers read the same snapshot.
    let guard = UpdateGuard::from_task(&stored);
    let mut dating = stored.clone();
    let mut assigning = stored;

    dating
        .set_due_date(due)
        .expect("due date should be set while pending");
    world
        .repository
        .update(&dating, guard)
        .await
        .expect("due-date writer should win");

    // The assignment writer never saw the due date; its whole-record write
    // would revert it, so the stale guard must reject it.
    assigning
        .assign_executor(world.executor.id(), &clock)
        .expect("assignment should succeed");
    let result = world.repository.update(&assigning, guard).await;
    assert!(matches!(result, Err(TaskRepositoryError::StaleUpdate(_))));

    let current = world
        .repository
        .find_by_id(dating.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(current.due_at(), Some(due));
    assert!(current.executor_id().is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn guard_tracks_status_changes(world: World) {
    let clock = DefaultClock;
    let stored = create_pending(&world, "Compra urgente").await;
    let stale_guard = UpdateGuard::from_task(&stored);

    let mut task = stored;
    task.assign_executor(world.executor.id(), &clock)
        .expect("assignment should succeed");
    world
        .repository
        .update(&task, stale_guard)
        .await
        .expect("update should succeed");

    let fresh_guard = UpdateGuard::from_task(&task);
    task.advance_to(TaskStatus::EnProgreso, &clock)
        .expect("transition should succeed");
    world
        .repository
        .update(&task, fresh_guard)
        .await
        .expect("fresh guard should pass");

    // The pre-assignment guard no longer matches the stored record.
    let result = world.repository.update(&task, stale_guard).await;
    assert!(matches!(result, Err(TaskRepositoryError::StaleUpdate(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn storing_the_same_task_twice_is_a_duplicate(world: World) {
    let stored = create_pending(&world, "Retiro duplicado").await;

    let result = world.repository.store(&stored).await;
    assert!(matches!(result, Err(TaskRepositoryError::DuplicateTask(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_missing_task_reports_not_found(world: World) {
    let result = world.repository.delete(TaskId::new()).await;
    assert!(matches!(result, Err(TaskRepositoryError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updating_a_deleted_task_reports_not_found(world: World) {
    let clock = DefaultClock;
    let stored = create_pending(&world, "Retiro fantasma").await;
    let guard = UpdateGuard::from_task(&stored);

    world
        .repository
        .delete(stored.id())
        .await
        .expect("deletion should succeed");

    let mut task = stored;
    task.assign_executor(world.executor.id(), &clock)
        .expect("assignment should succeed");
    let result = world.repository.update(&task, guard).await;
    assert!(matches!(result, Err(TaskRepositoryError::NotFound(_))));
}
