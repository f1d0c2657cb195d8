// Service-level tests for task activity, catalog checks, project
// assignment and cross-session task rollups.

use worktrace_runtime::{Error, TaskCatalog};
use worktrace_testing::TrackerWorld;
use worktrace_types::{Error as DomainError, EventKind, TaskId};

#[test]
fn test_task_activity_requires_a_known_task_of_the_tenant() {
    let world = TrackerWorld::new();
    let sessions = world.tracker().sessions();
    let tasks = world.tracker().tasks();
    let tenant = world.identity.tenant_id;

    let session = sessions.start(world.identity, vec![]).expect("start");
    world.advance_ms(1_000);

    let unknown = TaskId::generate();
    assert!(matches!(
        tasks.activate(tenant, session.id, unknown).unwrap_err(),
        Error::NotFound(_)
    ));

    let foreign = world.seed_foreign_task("someone else's task");
    assert!(matches!(
        tasks.activate(tenant, session.id, foreign.id).unwrap_err(),
        Error::AccessDenied(_)
    ));

    let events = world.db.events_for_session(session.id).expect("events");
    assert_eq!(events.len(), 1, "failed checks must append nothing");
}

#[test]
fn test_task_activity_on_terminal_session_appends_nothing() {
    let world = TrackerWorld::new();
    let sessions = world.tracker().sessions();
    let tasks = world.tracker().tasks();
    let tenant = world.identity.tenant_id;
    let task = world.seed_task("late work");

    let session = sessions.start(world.identity, vec![]).expect("start");
    world.advance_ms(1_000);
    sessions.finish(tenant, session.id, None).expect("finish");

    world.advance_ms(1_000);
    assert!(matches!(
        tasks.activate(tenant, session.id, task.id).unwrap_err(),
        Error::Domain(DomainError::InvalidTransition { .. })
    ));
    assert!(matches!(
        tasks.mark_done(tenant, session.id, task.id).unwrap_err(),
        Error::Domain(DomainError::InvalidTransition { .. })
    ));

    let events = world.db.events_for_session(session.id).expect("events");
    assert_eq!(events.len(), 2);
}

#[test]
fn test_activate_deactivate_bounds_task_credit() {
    let world = TrackerWorld::new();
    let sessions = world.tracker().sessions();
    let tasks = world.tracker().tasks();
    let tenant = world.identity.tenant_id;
    let task = world.seed_task("bounded work");

    let session = sessions.start(world.identity, vec![]).expect("start");
    world.advance_ms(1_000);
    tasks.activate(tenant, session.id, task.id).expect("activate");
    world.advance_ms(2_500);
    tasks.deactivate(tenant, session.id, task.id).expect("deactivate");
    world.advance_ms(1_500);

    let view = sessions
        .get(tenant, session.id, false)
        .expect("get")
        .expect("view");
    assert_eq!(view.durations.effective_ms, 5_000);
    assert_eq!(view.durations.on_task_ms, 2_500);
    assert_eq!(view.tasks[0].active_ms, 2_500);
    assert_eq!(view.tasks[0].first_activated_at, Some(session.started_at + chrono::Duration::milliseconds(1_000)));
}

#[test]
fn test_mark_done_flips_catalog_and_keeps_task_active() {
    let world = TrackerWorld::new();
    let sessions = world.tracker().sessions();
    let tasks = world.tracker().tasks();
    let tenant = world.identity.tenant_id;
    let task = world.seed_task("flippable");

    let session = sessions.start(world.identity, vec![]).expect("start");
    world.advance_ms(1_000);
    tasks.activate(tenant, session.id, task.id).expect("activate");
    world.advance_ms(1_000);
    tasks.mark_done(tenant, session.id, task.id).expect("mark done");

    let stored = world
        .catalog
        .task(task.id)
        .expect("catalog")
        .expect("task");
    assert!(stored.done);

    // Still active: credit keeps accruing after the done marker.
    world.advance_ms(2_000);
    let view = sessions
        .get(tenant, session.id, false)
        .expect("get")
        .expect("view");
    assert_eq!(view.tasks[0].active_ms, 3_000);
    assert!(view.tasks[0].was_completed);

    // Reset flips the catalog back and drops the task from the active set.
    world.advance_ms(1_000);
    tasks.reset(tenant, session.id, task.id).expect("reset");
    let stored = world
        .catalog
        .task(task.id)
        .expect("catalog")
        .expect("task");
    assert!(!stored.done);

    world.advance_ms(5_000);
    let view = sessions
        .get(tenant, session.id, false)
        .expect("get")
        .expect("view");
    assert_eq!(view.tasks[0].active_ms, 4_000);
    assert!(!view.tasks[0].was_completed);
}

#[test]
fn test_project_assignment_round_trip() {
    let world = TrackerWorld::new();
    let sessions = world.tracker().sessions();
    let projects = world.tracker().projects();
    let tenant = world.identity.tenant_id;
    let project = world.seed_project("infra");

    let session = sessions.start(world.identity, vec![]).expect("start");
    assert!(session.project_ids.is_empty());

    world.advance_ms(1_000);
    let assigned = projects
        .assign(tenant, session.id, project.id)
        .expect("assign");
    assert!(assigned.project_ids.contains(&project.id));

    // Assigning again is a set no-op but still records the event.
    world.advance_ms(1_000);
    let again = projects
        .assign(tenant, session.id, project.id)
        .expect("assign again");
    assert_eq!(again.project_ids.len(), 1);

    world.advance_ms(1_000);
    let unassigned = projects
        .unassign(tenant, session.id, project.id)
        .expect("unassign");
    assert!(unassigned.project_ids.is_empty());

    let events = world.db.events_for_session(session.id).expect("events");
    let kinds: Vec<EventKind> = events.iter().map(|e| e.payload.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::SessionStarted,
            EventKind::ProjectAssigned,
            EventKind::ProjectAssigned,
            EventKind::ProjectUnassigned,
        ]
    );

    // Unknown project is rejected.
    world.advance_ms(1_000);
    assert!(matches!(
        projects
            .assign(tenant, session.id, worktrace_types::ProjectId::generate())
            .unwrap_err(),
        Error::NotFound(_)
    ));
}

#[test]
fn test_view_rolls_tasks_up_into_projects() {
    let world = TrackerWorld::new();
    let sessions = world.tracker().sessions();
    let tasks = world.tracker().tasks();
    let tenant = world.identity.tenant_id;

    let project = world.seed_project("api");
    let in_project = world.seed_task_in_project("endpoint work", project.id);
    let loose = world.seed_task("standalone chore");

    let session = sessions.start(world.identity, vec![]).expect("start");
    world.advance_ms(1_000);
    tasks
        .activate(tenant, session.id, in_project.id)
        .expect("activate");
    world.advance_ms(2_000);
    tasks
        .deactivate(tenant, session.id, in_project.id)
        .expect("deactivate");
    world.advance_ms(1_000);
    tasks.activate(tenant, session.id, loose.id).expect("activate");
    world.advance_ms(3_000);

    let view = sessions
        .get(tenant, session.id, false)
        .expect("get")
        .expect("view");

    // Only the projected task contributes to a project bucket.
    assert_eq!(view.projects.len(), 1);
    assert_eq!(view.projects[0].project_id, project.id);
    assert_eq!(view.projects[0].active_ms, 2_000);

    // Both tasks appear in the per-task rollup, biggest first.
    assert_eq!(view.tasks.len(), 2);
    assert_eq!(view.tasks[0].task_id, loose.id);
    assert_eq!(view.tasks[0].active_ms, 3_000);
    assert_eq!(view.tasks[1].active_ms, 2_000);
}

#[test]
fn test_task_stats_across_sessions() {
    let world = TrackerWorld::new();
    let sessions = world.tracker().sessions();
    let tasks = world.tracker().tasks();
    let tenant = world.identity.tenant_id;
    let task = world.seed_task("long-running refactor");

    // First session: 3000ms on the task, one pause, 1000ms paused.
    let first = sessions.start(world.identity, vec![]).expect("start");
    world.advance_ms(1_000);
    tasks.activate(tenant, first.id, task.id).expect("activate");
    world.advance_ms(2_000);
    sessions.pause(tenant, first.id).expect("pause");
    world.advance_ms(1_000);
    sessions.resume(tenant, first.id).expect("resume");
    world.advance_ms(1_000);
    tasks.deactivate(tenant, first.id, task.id).expect("deactivate");
    world.advance_ms(1_000);
    sessions.finish(tenant, first.id, None).expect("finish");

    // Second session: 2000ms on the task, no pauses.
    world.advance_ms(10_000);
    let second = sessions.start(world.identity, vec![]).expect("start");
    world.advance_ms(1_000);
    tasks.activate(tenant, second.id, task.id).expect("activate");
    world.advance_ms(2_000);
    sessions.finish(tenant, second.id, None).expect("finish");

    // A third session that never touches the task.
    world.advance_ms(1_000);
    let third = sessions.start(world.identity, vec![]).expect("start");
    world.advance_ms(500);
    sessions.finish(tenant, third.id, None).expect("finish");

    let stats = tasks.stats(world.identity, task.id).expect("stats");
    assert_eq!(stats.task_id, task.id);
    assert_eq!(stats.session_count, 2);
    assert_eq!(stats.total_tracked_ms, 5_000);
    assert_eq!(stats.total_paused_ms, 1_000);
    assert_eq!(stats.pause_count, 1);
    assert_eq!(stats.last_session_at, Some(second.started_at));
    assert_eq!(stats.last_session_task_ms, 2_000);
}

#[test]
fn test_task_stats_with_no_sessions_is_all_zero() {
    let world = TrackerWorld::new();
    let task = world.seed_task("untouched");

    let stats = world
        .tracker()
        .tasks()
        .stats(world.identity, task.id)
        .expect("stats");
    assert_eq!(stats.session_count, 0);
    assert_eq!(stats.total_tracked_ms, 0);
    assert_eq!(stats.total_paused_ms, 0);
    assert_eq!(stats.pause_count, 0);
    assert_eq!(stats.last_session_at, None);
    assert_eq!(stats.last_session_task_ms, 0);
}

#[test]
fn test_task_stats_verifies_the_task() {
    let world = TrackerWorld::new();
    let tasks = world.tracker().tasks();

    assert!(matches!(
        tasks.stats(world.identity, TaskId::generate()).unwrap_err(),
        Error::NotFound(_)
    ));

    let foreign = world.seed_foreign_task("not yours");
    assert!(matches!(
        tasks.stats(world.identity, foreign.id).unwrap_err(),
        Error::AccessDenied(_)
    ));
}

#[test]
fn test_register_task_and_project() {
    let world = TrackerWorld::new();
    let tasks = world.tracker().tasks();
    let projects = world.tracker().projects();
    let tenant = world.identity.tenant_id;

    let project = projects.register(tenant, "platform").expect("register");
    let task = tasks
        .register(tenant, "  upgrade the runners  ", Some(project.id))
        .expect("register");
    assert_eq!(task.name, "upgrade the runners");
    assert_eq!(task.project_id, Some(project.id));
    assert!(!task.done);

    let listed = tasks.list(tenant).expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(projects.list(tenant).expect("list").len(), 1);

    // Validation and referential checks.
    assert!(matches!(
        tasks.register(tenant, "   ", None).unwrap_err(),
        Error::Domain(DomainError::Validation(_))
    ));
    assert!(matches!(
        tasks
            .register(tenant, "orphan", Some(worktrace_types::ProjectId::generate()))
            .unwrap_err(),
        Error::NotFound(_)
    ));
    assert!(matches!(
        projects.register(tenant, "").unwrap_err(),
        Error::Domain(DomainError::Validation(_))
    ));
}
