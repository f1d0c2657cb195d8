use anyhow::Result;
use worktrace_testing::TestWorld;
use worktrace_types::{ProjectId, TenantId};

#[test]
fn test_catalog_round_trip() -> Result<()> {
    let world = TestWorld::new();

    let project = world.run_json(&["catalog", "add-project", "billing rework"])?;
    let project_id = project["id"].as_str().expect("project id").to_string();

    let task = world.run_json(&[
        "catalog",
        "add-task",
        "migrate invoices",
        "--project",
        &project_id,
    ])?;
    assert_eq!(task["done"], false);
    assert_eq!(task["project_id"], project_id.as_str());

    let listing = world.run_json(&["catalog", "list"])?;
    assert_eq!(listing["tasks"].as_array().expect("tasks").len(), 1);
    assert_eq!(listing["projects"].as_array().expect("projects").len(), 1);
    assert_eq!(listing["tasks"][0]["name"], "migrate invoices");
    Ok(())
}

#[test]
fn test_add_task_under_unknown_project_fails() -> Result<()> {
    let world = TestWorld::new();
    let ghost = ProjectId::generate().to_string();

    let result = world.run(&["catalog", "add-task", "orphan", "--project", &ghost])?;
    assert!(!result.success());
    assert!(result.stderr().contains("Not found"));
    Ok(())
}

#[test]
fn test_blank_task_name_is_rejected() -> Result<()> {
    let world = TestWorld::new();

    let result = world.run(&["catalog", "add-task", "   "])?;
    assert!(!result.success());
    assert!(result.stderr().contains("validation failed"));
    Ok(())
}

#[test]
fn test_done_flips_the_catalog_and_reset_clears_it() -> Result<()> {
    let world = TestWorld::new();
    let task = world.run_json(&["catalog", "add-task", "write docs"])?;
    let task_id = task["id"].as_str().expect("task id").to_string();

    world.run_json(&["session", "start"])?;
    world.run_json(&["task", "activate", &task_id])?;
    world.run_json(&["task", "done", &task_id])?;

    let listing = world.run_json(&["catalog", "list"])?;
    assert_eq!(listing["tasks"][0]["done"], true);

    world.run_json(&["task", "reset", &task_id])?;
    let listing = world.run_json(&["catalog", "list"])?;
    assert_eq!(listing["tasks"][0]["done"], false);
    Ok(())
}

#[test]
fn test_task_activity_shows_up_in_the_session_view() -> Result<()> {
    let world = TestWorld::new();
    let task = world.run_json(&["catalog", "add-task", "wire the parser"])?;
    let task_id = task["id"].as_str().expect("task id").to_string();

    let started = world.run_json(&["session", "start"])?;
    let session_id = started["id"].as_str().expect("session id").to_string();
    world.run_json(&["task", "activate", &task_id])?;

    let view = world.run_json(&["session", "show", &session_id])?;
    let tasks = view["tasks"].as_array().expect("task rollup");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["task_id"], task_id.as_str());
    assert_eq!(tasks[0]["was_active"], true);
    Ok(())
}

#[test]
fn test_stats_count_referencing_sessions() -> Result<()> {
    let world = TestWorld::new();
    let task = world.run_json(&["catalog", "add-task", "sweep the queue"])?;
    let task_id = task["id"].as_str().expect("task id").to_string();

    let first = world.run_json(&["session", "start"])?;
    let first_id = first["id"].as_str().expect("session id").to_string();
    world.run_json(&["task", "activate", &task_id])?;
    world.run_json(&["session", "finish", &first_id])?;

    world.run_json(&["session", "start"])?;
    world.run_json(&["task", "activate", &task_id])?;

    let stats = world.run_json(&["task", "stats", &task_id])?;
    assert_eq!(stats["task_id"], task_id.as_str());
    assert_eq!(stats["session_count"], 2);
    assert!(stats["last_session_at"].is_string());
    Ok(())
}

#[test]
fn test_project_assignment_round_trip() -> Result<()> {
    let world = TestWorld::new();
    let project = world.run_json(&["catalog", "add-project", "platform"])?;
    let project_id = project["id"].as_str().expect("project id").to_string();

    world.run_json(&["session", "start"])?;

    let assigned = world.run_json(&["project", "assign", &project_id])?;
    let ids = assigned["project_ids"].as_array().expect("project ids");
    assert_eq!(ids.len(), 1);
    assert_eq!(ids[0], project_id.as_str());

    let unassigned = world.run_json(&["project", "unassign", &project_id])?;
    assert_eq!(
        unassigned["project_ids"]
            .as_array()
            .expect("project ids")
            .len(),
        0
    );
    Ok(())
}

#[test]
fn test_start_with_projects_records_the_assignment() -> Result<()> {
    let world = TestWorld::new();
    let project = world.run_json(&["catalog", "add-project", "platform"])?;
    let project_id = project["id"].as_str().expect("project id").to_string();

    let started = world.run_json(&["session", "start", "--project", &project_id])?;
    let ids = started["project_ids"].as_array().expect("project ids");
    assert_eq!(ids.len(), 1);
    assert_eq!(ids[0], project_id.as_str());
    Ok(())
}

#[test]
fn test_foreign_task_is_access_denied() -> Result<()> {
    let world = TestWorld::new();

    let foreign_tenant = TenantId::generate().to_string();
    let task = world.run_json(&["catalog", "add-task", "theirs", "--tenant", &foreign_tenant])?;
    let task_id = task["id"].as_str().expect("task id").to_string();

    world.run_json(&["session", "start"])?;
    let result = world.run(&["task", "activate", &task_id])?;
    assert!(!result.success());
    assert!(
        result.stderr().contains("Access denied"),
        "unexpected stderr: {}",
        result.stderr()
    );
    Ok(())
}

#[test]
fn test_task_commands_require_an_open_session() -> Result<()> {
    let world = TestWorld::new();
    let task = world.run_json(&["catalog", "add-task", "stray"])?;
    let task_id = task["id"].as_str().expect("task id").to_string();

    let result = world.run(&["task", "activate", &task_id])?;
    assert!(!result.success());
    assert!(result.stderr().contains("no open session"));
    Ok(())
}
