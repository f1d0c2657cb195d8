use anyhow::Result;
use worktrace_runtime::{Identity, Tracker};
use worktrace_types::{SessionId, TaskId};

use crate::output::{self, short_id};
use crate::types::OutputFormat;

pub fn activate(
    tracker: &Tracker,
    identity: Identity,
    session_id: SessionId,
    task_id: TaskId,
    format: OutputFormat,
) -> Result<()> {
    let session = tracker
        .tasks()
        .activate(identity.tenant_id, session_id, task_id)?;

    match format {
        OutputFormat::Json => output::print_json(&session),
        OutputFormat::Plain => {
            println!(
                "Activated task {} in session {}",
                short_id(task_id),
                short_id(session.id)
            );
            Ok(())
        }
    }
}

pub fn deactivate(
    tracker: &Tracker,
    identity: Identity,
    session_id: SessionId,
    task_id: TaskId,
    format: OutputFormat,
) -> Result<()> {
    let session = tracker
        .tasks()
        .deactivate(identity.tenant_id, session_id, task_id)?;

    match format {
        OutputFormat::Json => output::print_json(&session),
        OutputFormat::Plain => {
            println!(
                "Deactivated task {} in session {}",
                short_id(task_id),
                short_id(session.id)
            );
            Ok(())
        }
    }
}

pub fn done(
    tracker: &Tracker,
    identity: Identity,
    session_id: SessionId,
    task_id: TaskId,
    format: OutputFormat,
) -> Result<()> {
    let session = tracker
        .tasks()
        .mark_done(identity.tenant_id, session_id, task_id)?;

    match format {
        OutputFormat::Json => output::print_json(&session),
        OutputFormat::Plain => {
            println!(
                "Marked task {} done in session {}",
                short_id(task_id),
                short_id(session.id)
            );
            Ok(())
        }
    }
}

pub fn reset(
    tracker: &Tracker,
    identity: Identity,
    session_id: SessionId,
    task_id: TaskId,
    format: OutputFormat,
) -> Result<()> {
    let session = tracker
        .tasks()
        .reset(identity.tenant_id, session_id, task_id)?;

    match format {
        OutputFormat::Json => output::print_json(&session),
        OutputFormat::Plain => {
            println!(
                "Reset task {} in session {}",
                short_id(task_id),
                short_id(session.id)
            );
            Ok(())
        }
    }
}

pub fn stats(
    tracker: &Tracker,
    identity: Identity,
    task_id: TaskId,
    format: OutputFormat,
) -> Result<()> {
    let stats = tracker.tasks().stats(identity, task_id)?;

    match format {
        OutputFormat::Json => output::print_json(&stats),
        OutputFormat::Plain => {
            output::session::print_task_stats(&stats);
            Ok(())
        }
    }
}
