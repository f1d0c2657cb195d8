use anyhow::{Result, bail};
use worktrace_runtime::{Identity, SessionFilter, Tracker};
use worktrace_types::{CancelMode, ProjectId, SessionId};

use crate::output;
use crate::output::time::format_ms;
use crate::types::OutputFormat;

pub fn start(
    tracker: &Tracker,
    identity: Identity,
    project_ids: Vec<ProjectId>,
    format: OutputFormat,
) -> Result<()> {
    let session = tracker.sessions().start(identity, project_ids)?;

    match format {
        OutputFormat::Json => output::print_json(&session),
        OutputFormat::Plain => {
            output::session::print_transition("Started", &session);
            Ok(())
        }
    }
}

pub fn pause(
    tracker: &Tracker,
    identity: Identity,
    session_id: SessionId,
    format: OutputFormat,
) -> Result<()> {
    let session = tracker.sessions().pause(identity.tenant_id, session_id)?;

    match format {
        OutputFormat::Json => output::print_json(&session),
        OutputFormat::Plain => {
            output::session::print_transition("Paused", &session);
            Ok(())
        }
    }
}

pub fn resume(
    tracker: &Tracker,
    identity: Identity,
    session_id: SessionId,
    format: OutputFormat,
) -> Result<()> {
    let session = tracker.sessions().resume(identity.tenant_id, session_id)?;

    match format {
        OutputFormat::Json => output::print_json(&session),
        OutputFormat::Plain => {
            output::session::print_transition("Resumed", &session);
            Ok(())
        }
    }
}

pub fn finish(
    tracker: &Tracker,
    identity: Identity,
    session_id: SessionId,
    summary: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let sessions = tracker.sessions();
    let session = sessions.finish(identity.tenant_id, session_id, summary)?;

    match format {
        OutputFormat::Json => output::print_json(&session),
        OutputFormat::Plain => {
            output::session::print_transition("Finished", &session);
            if let Some(view) = sessions.get(identity.tenant_id, session_id, false)? {
                println!("  tracked {}", format_ms(view.durations.effective_ms));
            }
            Ok(())
        }
    }
}

pub fn cancel(
    tracker: &Tracker,
    identity: Identity,
    session_id: SessionId,
    mode: Option<CancelMode>,
    format: OutputFormat,
) -> Result<()> {
    let session = tracker
        .sessions()
        .cancel(identity.tenant_id, session_id, mode)?;

    match format {
        OutputFormat::Json => output::print_json(&session),
        OutputFormat::Plain => {
            output::session::print_transition("Cancelled", &session);
            Ok(())
        }
    }
}

pub fn step(
    tracker: &Tracker,
    identity: Identity,
    session_id: SessionId,
    text: &str,
    format: OutputFormat,
) -> Result<()> {
    let session = tracker
        .sessions()
        .log_step(identity.tenant_id, session_id, text)?;

    match format {
        OutputFormat::Json => output::print_json(&session),
        OutputFormat::Plain => {
            println!("Logged step into session {}", output::short_id(session.id));
            Ok(())
        }
    }
}

pub fn current(tracker: &Tracker, identity: Identity, format: OutputFormat) -> Result<()> {
    let session = tracker.sessions().active(identity)?;

    match format {
        OutputFormat::Json => output::print_json(&session),
        OutputFormat::Plain => {
            match session {
                Some(session) => output::session::print_brief(&session),
                None => println!("No open session."),
            }
            Ok(())
        }
    }
}

pub fn show(
    tracker: &Tracker,
    identity: Identity,
    session_id: SessionId,
    include_discarded: bool,
    format: OutputFormat,
) -> Result<()> {
    let Some(view) = tracker
        .sessions()
        .get(identity.tenant_id, session_id, include_discarded)?
    else {
        bail!("session {} not found", session_id);
    };

    match format {
        OutputFormat::Json => output::print_json(&view),
        OutputFormat::Plain => {
            output::session::print_view(&view);
            Ok(())
        }
    }
}

pub fn list(
    tracker: &Tracker,
    identity: Identity,
    filter: SessionFilter,
    format: OutputFormat,
) -> Result<()> {
    let overviews = tracker.sessions().list(identity, filter)?;

    match format {
        OutputFormat::Json => output::print_json(&overviews),
        OutputFormat::Plain => {
            output::session::print_overview_table(&overviews);
            Ok(())
        }
    }
}
