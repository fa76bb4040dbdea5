//! End-to-end lifecycle flows through the public service API.

use chrono::{Duration, Utc};
use rstest::rstest;
use vidacel::task::{
    domain::{TaskConflictError, TaskStatus},
    ports::TaskRepository,
    services::{CreateTaskRequest, TaskLifecycleError},
};

use super::helpers::{World, create_pending, world};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_lifecycle_keeps_timestamp_invariants(world: World) {
    let task = create_pending(&world, "Retiro de escombros").await;
    assert_eq!(task.status(), TaskStatus::Pendiente);
    assert!(task.completed_at().is_none());

    let due = Utc::now() + Duration::days(3);
    let dated = world
        .service
        .set_due_date(&world.requester, task.id(), due)
        .await
        .expect("due date should be set while pending");
    assert_eq!(dated.due_at(), Some(due));

    let assigned = world
        .service
        .assign(&world.admin, task.id(), world.executor.id())
        .await
        .expect("assignment should succeed");
    assert_eq!(assigned.executor_id(), Some(world.executor.id()));
    assert!(assigned.assigned_at().is_some());

    let started = world
        .service
        .change_status(&world.executor, task.id(), "En Progreso")
        .await
        .expect("executor should start the task");
    assert_eq!(started.status(), TaskStatus::EnProgreso);
    assert!(started.completed_at().is_none());

    let finished = world
        .service
        .change_status(&world.executor, task.id(), "Finalizada")
        .await
        .expect("executor should finalize the task");
    assert_eq!(finished.status(), TaskStatus::Finalizada);
    assert!(finished.completed_at().is_some());

    // The stored record carries the same invariants as the returned one.
    let stored = world
        .repository
        .find_by_id(task.id())
        .await
        .expect("lookup should succeed")
        .expect("task should still exist");
    assert_eq!(stored.status(), TaskStatus::Finalizada);
    assert!(stored.completed_at().is_some());
    assert!(stored.assigned_at().is_some());
    assert_eq!(stored.due_at(), Some(due));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_never_regresses_after_finalization(world: World) {
    let task = create_pending(&world, "Compra de repuestos").await;
    world
        .service
        .assign(&world.admin, task.id(), world.executor.id())
        .await
        .expect("assignment should succeed");
    world
        .service
        .change_status(&world.admin, task.id(), "En Progreso")
        .await
        .expect("transition should succeed");
    world
        .service
        .change_status(&world.admin, task.id(), "Finalizada")
        .await
        .expect("finalization should succeed");

    for target in ["Pendiente", "En Progreso", "Finalizada"] {
        let result = world
            .service
            .change_status(&world.admin, task.id(), target)
            .await;
        assert!(matches!(
            result,
            Err(TaskLifecycleError::Conflict(
                TaskConflictError::InvalidStatusTransition { .. }
            ))
        ));
        let stored = world
            .repository
            .find_by_id(task.id())
            .await
            .expect("lookup should succeed")
            .expect("task should still exist");
        assert_eq!(stored.status(), TaskStatus::Finalizada);
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deletion_is_permanent(world: World) {
    let task = create_pending(&world, "Tarea descartable").await;
    world
        .service
        .delete_task(&world.admin, task.id())
        .await
        .expect("deletion should succeed");

    let found = world
        .repository
        .find_by_id(task.id())
        .await
        .expect("lookup should succeed");
    assert!(found.is_none());

    let again = world.service.delete_task(&world.admin, task.id()).await;
    assert!(matches!(again, Err(TaskLifecycleError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_creation_leaves_store_untouched(world: World) {
    let result = world
        .service
        .create_task(
            &world.requester,
            CreateTaskRequest::new("Pedido raro", "Inventado"),
        )
        .await;
    assert!(matches!(result, Err(TaskLifecycleError::InvalidInput(_))));

    let all = world
        .service
        .all_tasks(&world.admin)
        .await
        .expect("listing should succeed");
    assert!(all.is_empty());
}
