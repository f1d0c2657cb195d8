use anyhow::Result;
use worktrace_testing::TestWorld;
use worktrace_testing::assertions::{assert_session_count, assert_session_status};
use worktrace_types::TenantId;

#[test]
fn test_start_pause_resume_finish_round_trip() -> Result<()> {
    let world = TestWorld::new();

    let started = world.run_json(&["session", "start"])?;
    assert_session_status(&started, "running")?;
    let id = started["id"].as_str().expect("session id").to_string();

    let paused = world.run_json(&["session", "pause"])?;
    assert_session_status(&paused, "paused")?;

    let resumed = world.run_json(&["session", "resume", &id])?;
    assert_session_status(&resumed, "running")?;

    let finished = world.run_json(&["session", "finish", "--summary", "shipped the thing"])?;
    assert_session_status(&finished, "finished")?;
    assert_eq!(finished["summary"], "shipped the thing");

    let view = world.run_json(&["session", "show", &id])?;
    assert_session_status(&view, "finished")?;
    assert!(view["durations"]["effective_ms"].as_i64().is_some());

    let events = view["events"].as_array().expect("events array");
    assert_eq!(events.len(), 4);
    assert_eq!(events[0]["type"], "session_started");
    assert_eq!(events[3]["type"], "session_finished");
    assert_eq!(events[3]["content"]["summary"], "shipped the thing");
    Ok(())
}

#[test]
fn test_current_reports_the_open_session() -> Result<()> {
    let world = TestWorld::new();

    let none = world.run_json(&["session", "current"])?;
    assert!(none.is_null(), "expected null before any session");

    world.run_json(&["session", "start"])?;
    let current = world.run_json(&["session", "current"])?;
    assert_session_status(&current, "running")?;
    Ok(())
}

#[test]
fn test_second_start_is_rejected_while_open() -> Result<()> {
    let world = TestWorld::new();
    world.run_json(&["session", "start"])?;

    let result = world.run(&["session", "start"])?;
    assert!(!result.success());
    assert!(
        result.stderr().contains("an open session already exists"),
        "unexpected stderr: {}",
        result.stderr()
    );
    Ok(())
}

#[test]
fn test_lifecycle_commands_require_an_open_session() -> Result<()> {
    let world = TestWorld::new();

    let result = world.run(&["session", "pause"])?;
    assert!(!result.success());
    assert!(result.stderr().contains("no open session"));

    let result = world.run(&["step", "a note with nowhere to go"])?;
    assert!(!result.success());
    assert!(result.stderr().contains("no open session"));
    Ok(())
}

#[test]
fn test_invalid_transition_surfaces_cleanly() -> Result<()> {
    let world = TestWorld::new();
    let started = world.run_json(&["session", "start"])?;
    let id = started["id"].as_str().expect("session id").to_string();
    world.run_json(&["session", "finish", &id])?;

    let result = world.run(&["session", "pause", &id])?;
    assert!(!result.success());
    assert!(
        result.stderr().contains("cannot pause a finished session"),
        "unexpected stderr: {}",
        result.stderr()
    );
    Ok(())
}

#[test]
fn test_step_appears_in_the_event_log() -> Result<()> {
    let world = TestWorld::new();
    let started = world.run_json(&["session", "start"])?;
    let id = started["id"].as_str().expect("session id").to_string();

    world.run_json(&["step", "reviewed the migration plan"])?;

    let view = world.run_json(&["session", "show", &id])?;
    let events = view["events"].as_array().expect("events array");
    let step = events
        .iter()
        .find(|e| e["type"] == "step_logged")
        .expect("step event");
    assert_eq!(step["content"]["text"], "reviewed the migration plan");
    Ok(())
}

#[test]
fn test_blank_step_is_rejected() -> Result<()> {
    let world = TestWorld::new();
    world.run_json(&["session", "start"])?;

    let result = world.run(&["step", "   "])?;
    assert!(!result.success());
    assert!(result.stderr().contains("validation failed"));
    Ok(())
}

#[test]
fn test_list_orders_newest_first_and_filters_by_status() -> Result<()> {
    let world = TestWorld::new();

    let first = world.run_json(&["session", "start"])?;
    let first_id = first["id"].as_str().expect("session id").to_string();
    world.run_json(&["session", "finish", &first_id])?;

    let second = world.run_json(&["session", "start"])?;
    let second_id = second["id"].as_str().expect("session id").to_string();

    let all = world.run_json(&["session", "list"])?;
    assert_session_count(&all, 2)?;
    assert_eq!(all[0]["session"]["id"], second_id.as_str());
    assert_eq!(all[1]["session"]["id"], first_id.as_str());

    let finished = world.run_json(&["session", "list", "--status", "finished"])?;
    assert_session_count(&finished, 1)?;
    assert_eq!(finished[0]["session"]["id"], first_id.as_str());
    Ok(())
}

#[test]
fn test_discarded_sessions_hide_until_asked_for() -> Result<()> {
    let world = TestWorld::new();

    let started = world.run_json(&["session", "start"])?;
    let id = started["id"].as_str().expect("session id").to_string();

    let cancelled = world.run_json(&["session", "cancel", "--discard"])?;
    assert_session_status(&cancelled, "cancelled")?;
    assert_eq!(cancelled["is_deleted"], true);

    let visible = world.run_json(&["session", "list"])?;
    assert_session_count(&visible, 0)?;

    let everything = world.run_json(&["session", "list", "--include-discarded"])?;
    assert_session_count(&everything, 1)?;

    let hidden = world.run(&["session", "show", &id])?;
    assert!(!hidden.success());
    assert!(hidden.stderr().contains("not found"));

    let view = world.run_json(&["session", "show", &id, "--include-discarded"])?;
    assert_session_status(&view, "cancelled")?;
    Ok(())
}

#[test]
fn test_cancel_keep_excluded_stays_visible() -> Result<()> {
    let world = TestWorld::new();
    world.run_json(&["session", "start"])?;

    let cancelled = world.run_json(&["session", "cancel", "--keep-excluded"])?;
    assert_eq!(cancelled["excluded_from_summaries"], true);

    let listed = world.run_json(&["session", "list"])?;
    assert_session_count(&listed, 1)?;
    Ok(())
}

#[test]
fn test_conflicting_cancel_flags_are_rejected() -> Result<()> {
    let world = TestWorld::new();
    world.run_json(&["session", "start"])?;

    let result = world.run(&["session", "cancel", "--discard", "--keep-excluded"])?;
    assert!(!result.success());
    Ok(())
}

#[test]
fn test_malformed_session_id_is_reported() -> Result<()> {
    let world = TestWorld::new();

    let result = world.run(&["session", "show", "not-a-uuid"])?;
    assert!(!result.success());
    assert!(result.stderr().contains("invalid session id"));
    Ok(())
}

#[test]
fn test_foreign_tenant_sees_nothing() -> Result<()> {
    let world = TestWorld::new();
    world.run_json(&["session", "start"])?;

    let foreign_tenant = TenantId::generate().to_string();
    let listed = world.run_json(&["session", "list", "--tenant", &foreign_tenant])?;
    assert_session_count(&listed, 0)?;
    Ok(())
}

#[test]
fn test_bare_invocation_prints_guidance() -> Result<()> {
    let world = TestWorld::new();

    let result = world.run(&[])?;
    assert!(result.success());
    assert!(result.stdout().contains("worktrace"));
    Ok(())
}

#[test]
fn test_plain_list_renders_a_table() -> Result<()> {
    let world = TestWorld::new();
    world.run_json(&["session", "start"])?;

    let result = world.run(&["session", "list"])?;
    assert!(result.success());
    assert!(result.stdout().contains("ID"));
    assert!(result.stdout().contains("running"));
    Ok(())
}
