use anyhow::Result;
use worktrace_runtime::{Identity, Tracker};
use worktrace_types::{ProjectId, SessionId};

use crate::output::{self, short_id};
use crate::types::OutputFormat;

pub fn assign(
    tracker: &Tracker,
    identity: Identity,
    session_id: SessionId,
    project_id: ProjectId,
    format: OutputFormat,
) -> Result<()> {
    let session = tracker
        .projects()
        .assign(identity.tenant_id, session_id, project_id)?;

    match format {
        OutputFormat::Json => output::print_json(&session),
        OutputFormat::Plain => {
            println!(
                "Assigned project {} to session {}",
                short_id(project_id),
                short_id(session.id)
            );
            Ok(())
        }
    }
}

pub fn unassign(
    tracker: &Tracker,
    identity: Identity,
    session_id: SessionId,
    project_id: ProjectId,
    format: OutputFormat,
) -> Result<()> {
    let session = tracker
        .projects()
        .unassign(identity.tenant_id, session_id, project_id)?;

    match format {
        OutputFormat::Json => output::print_json(&session),
        OutputFormat::Plain => {
            println!(
                "Unassigned project {} from session {}",
                short_id(project_id),
                short_id(session.id)
            );
            Ok(())
        }
    }
}
