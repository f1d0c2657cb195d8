use anyhow::Result;
use serde::Serialize;
use worktrace_runtime::{Identity, Tracker};
use worktrace_store::{ProjectRecord, TaskRecord};
use worktrace_types::ProjectId;

use crate::output;
use crate::types::OutputFormat;

#[derive(Serialize)]
struct CatalogListing {
    tasks: Vec<TaskRecord>,
    projects: Vec<ProjectRecord>,
}

pub fn add_task(
    tracker: &Tracker,
    identity: Identity,
    name: &str,
    project_id: Option<ProjectId>,
    format: OutputFormat,
) -> Result<()> {
    let task = tracker
        .tasks()
        .register(identity.tenant_id, name, project_id)?;

    match format {
        OutputFormat::Json => output::print_json(&task),
        OutputFormat::Plain => {
            output::catalog::print_task(&task);
            Ok(())
        }
    }
}

pub fn add_project(
    tracker: &Tracker,
    identity: Identity,
    name: &str,
    format: OutputFormat,
) -> Result<()> {
    let project = tracker.projects().register(identity.tenant_id, name)?;

    match format {
        OutputFormat::Json => output::print_json(&project),
        OutputFormat::Plain => {
            output::catalog::print_project(&project);
            Ok(())
        }
    }
}

pub fn list(tracker: &Tracker, identity: Identity, format: OutputFormat) -> Result<()> {
    let tasks = tracker.tasks().list(identity.tenant_id)?;
    let projects = tracker.projects().list(identity.tenant_id)?;

    match format {
        OutputFormat::Json => output::print_json(&CatalogListing { tasks, projects }),
        OutputFormat::Plain => {
            output::catalog::print_listing(&tasks, &projects);
            Ok(())
        }
    }
}
