//! Role-scoped listings and calendar filtering.

use chrono::{Duration, Utc};
use rstest::rstest;
use vidacel::task::{
    domain::{Principal, Role, Task, UserId},
    services::{CreateTaskRequest, DueWindow, TaskLifecycleError},
};

use super::helpers::{World, create_pending, world};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn authored_listing_returns_only_own_tasks(world: World) {
    let mine = create_pending(&world, "Retiro A").await;
    let other = Principal::new(UserId::new(), Role::Requester, "Finanzas");
    world
        .service
        .create_task(&other, CreateTaskRequest::new("Retiro B", "Retiro"))
        .await
        .expect("task creation should succeed");

    let authored = world
        .service
        .tasks_authored_by(&world.requester)
        .await
        .expect("authored listing should succeed");
    assert_eq!(
        authored.iter().map(Task::id).collect::<Vec<_>>(),
        vec![mine.id()]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unassigned_listing_excludes_assigned_tasks(world: World) {
    let open = create_pending(&world, "Pendiente sin asignar").await;
    let taken = create_pending(&world, "Pendiente asignada").await;
    world
        .service
        .assign(&world.admin, taken.id(), world.executor.id())
        .await
        .expect("assignment should succeed");

    let unassigned = world
        .service
        .unassigned_tasks(&world.admin)
        .await
        .expect("unassigned listing should succeed");
    assert_eq!(
        unassigned.iter().map(Task::id).collect::<Vec<_>>(),
        vec![open.id()]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn calendar_bounds_are_inclusive(world: World) {
    let task = create_pending(&world, "Entrega puntual").await;
    let due = Utc::now() + Duration::days(2);
    world
        .service
        .set_due_date(&world.requester, task.id(), due)
        .await
        .expect("due date should be set");

    let exact = DueWindow::new().since(due).until(due);
    let view = world
        .service
        .due_calendar(&world.admin, exact)
        .await
        .expect("calendar should succeed");
    assert_eq!(view.iter().map(Task::id).collect::<Vec<_>>(), vec![task.id()]);

    let outside = DueWindow::new().since(due + Duration::seconds(1));
    let empty = world
        .service
        .due_calendar(&world.admin, outside)
        .await
        .expect("calendar should succeed");
    assert!(empty.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn calendar_skips_tasks_without_due_date(world: World) {
    create_pending(&world, "Sin fecha").await;

    let view = world
        .service
        .due_calendar(&world.admin, DueWindow::new().since(Utc::now()))
        .await
        .expect("calendar should succeed");
    assert!(view.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn executor_listing_requires_executor_role(world: World) {
    let denied = world.service.tasks_assigned_to(&world.requester).await;
    assert!(matches!(denied, Err(TaskLifecycleError::Forbidden { .. })));

    let empty = world
        .service
        .tasks_assigned_to(&world.executor)
        .await
        .expect("executor listing should succeed");
    assert!(empty.is_empty());
}
