use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use worktrace_runtime::{Identity, SessionFilter, Tracker, resolve_data_path};
use worktrace_types::{ActorId, CancelMode, ProjectId, SessionId, TaskId, TenantId};

use super::args::{CatalogCommand, Cli, Commands, ProjectCommand, SessionCommand, TaskCommand};
use super::handlers;

pub fn run(cli: Cli) -> Result<()> {
    let data_dir = resolve_data_path(cli.data_dir.as_deref())?;

    let Some(command) = cli.command else {
        return show_guidance(&data_dir);
    };

    let tracker = Tracker::open(&data_dir)?;
    let identity = tracker.identity(
        parse_id_opt::<TenantId>(cli.tenant.as_deref(), "tenant")?,
        parse_id_opt::<ActorId>(cli.actor.as_deref(), "actor")?,
    )?;
    let format = cli.format;

    match command {
        Commands::Session { command } => match command {
            SessionCommand::Start { projects } => {
                let project_ids = parse_ids::<ProjectId>(&projects, "project")?;
                handlers::session::start(&tracker, identity, project_ids, format)
            }
            SessionCommand::Pause { session_id } => {
                let id = resolve_session(&tracker, identity, session_id.as_deref())?;
                handlers::session::pause(&tracker, identity, id, format)
            }
            SessionCommand::Resume { session_id } => {
                let id = resolve_session(&tracker, identity, session_id.as_deref())?;
                handlers::session::resume(&tracker, identity, id, format)
            }
            SessionCommand::Finish {
                session_id,
                summary,
            } => {
                let id = resolve_session(&tracker, identity, session_id.as_deref())?;
                handlers::session::finish(&tracker, identity, id, summary, format)
            }
            SessionCommand::Cancel {
                session_id,
                discard,
                keep_excluded,
            } => {
                let id = resolve_session(&tracker, identity, session_id.as_deref())?;
                let mode = if discard {
                    Some(CancelMode::Discard)
                } else if keep_excluded {
                    Some(CancelMode::KeepExcluded)
                } else {
                    None
                };
                handlers::session::cancel(&tracker, identity, id, mode, format)
            }
            SessionCommand::Current => handlers::session::current(&tracker, identity, format),
            SessionCommand::Show {
                session_id,
                include_discarded,
            } => {
                let id = parse_id::<SessionId>(&session_id, "session")?;
                handlers::session::show(&tracker, identity, id, include_discarded, format)
            }
            SessionCommand::List {
                status,
                include_discarded,
            } => {
                let mut filter = SessionFilter::new();
                if let Some(status) = status {
                    filter = filter.status(status.as_status());
                }
                if include_discarded {
                    filter = filter.include_discarded();
                }
                handlers::session::list(&tracker, identity, filter, format)
            }
        },

        Commands::Task { command } => match command {
            TaskCommand::Activate { task_id, session } => {
                let task_id = parse_id::<TaskId>(&task_id, "task")?;
                let session_id = resolve_session(&tracker, identity, session.as_deref())?;
                handlers::task::activate(&tracker, identity, session_id, task_id, format)
            }
            TaskCommand::Deactivate { task_id, session } => {
                let task_id = parse_id::<TaskId>(&task_id, "task")?;
                let session_id = resolve_session(&tracker, identity, session.as_deref())?;
                handlers::task::deactivate(&tracker, identity, session_id, task_id, format)
            }
            TaskCommand::Done { task_id, session } => {
                let task_id = parse_id::<TaskId>(&task_id, "task")?;
                let session_id = resolve_session(&tracker, identity, session.as_deref())?;
                handlers::task::done(&tracker, identity, session_id, task_id, format)
            }
            TaskCommand::Reset { task_id, session } => {
                let task_id = parse_id::<TaskId>(&task_id, "task")?;
                let session_id = resolve_session(&tracker, identity, session.as_deref())?;
                handlers::task::reset(&tracker, identity, session_id, task_id, format)
            }
            TaskCommand::Stats { task_id } => {
                let task_id = parse_id::<TaskId>(&task_id, "task")?;
                handlers::task::stats(&tracker, identity, task_id, format)
            }
        },

        Commands::Project { command } => match command {
            ProjectCommand::Assign {
                project_id,
                session,
            } => {
                let project_id = parse_id::<ProjectId>(&project_id, "project")?;
                let session_id = resolve_session(&tracker, identity, session.as_deref())?;
                handlers::project::assign(&tracker, identity, session_id, project_id, format)
            }
            ProjectCommand::Unassign {
                project_id,
                session,
            } => {
                let project_id = parse_id::<ProjectId>(&project_id, "project")?;
                let session_id = resolve_session(&tracker, identity, session.as_deref())?;
                handlers::project::unassign(&tracker, identity, session_id, project_id, format)
            }
        },

        Commands::Catalog { command } => match command {
            CatalogCommand::AddTask { name, project } => {
                let project_id = parse_id_opt::<ProjectId>(project.as_deref(), "project")?;
                handlers::catalog::add_task(&tracker, identity, &name, project_id, format)
            }
            CatalogCommand::AddProject { name } => {
                handlers::catalog::add_project(&tracker, identity, &name, format)
            }
            CatalogCommand::List => handlers::catalog::list(&tracker, identity, format),
        },

        Commands::Step { text, session } => {
            let session_id = resolve_session(&tracker, identity, session.as_deref())?;
            handlers::session::step(&tracker, identity, session_id, &text, format)
        }
    }
}

/// Explicit session id if given, otherwise the actor's open session.
fn resolve_session(
    tracker: &Tracker,
    identity: Identity,
    explicit: Option<&str>,
) -> Result<SessionId> {
    if let Some(raw) = explicit {
        return parse_id(raw, "session");
    }

    match tracker.sessions().active(identity)? {
        Some(session) => Ok(session.id),
        None => bail!("no open session; start one with 'worktrace session start' or pass an id"),
    }
}

fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(raw).with_context(|| format!("invalid {} id '{}'", what, raw))
}

fn parse_id_opt<T: FromStr>(raw: Option<&str>, what: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.map(|raw| parse_id(raw, what)).transpose()
}

fn parse_ids<T: FromStr>(raw: &[String], what: &str) -> Result<Vec<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.iter().map(|raw| parse_id(raw, what)).collect()
}

fn show_guidance(data_dir: &Path) -> Result<()> {
    let db_exists = data_dir.join("worktrace.db").exists();

    println!("worktrace - Work session tracker\n");

    if !db_exists {
        println!("Get started:");
        println!("  worktrace session start            # Open a session and start the clock");
        println!("  worktrace catalog add-task <name>  # Register a task to track against\n");
    } else {
        println!("Quick commands:");
        println!("  worktrace session start            # Open a session");
        println!("  worktrace step \"<note>\"            # Log what just happened");
        println!("  worktrace session finish           # Close the session");
        println!("  worktrace session list             # Review recent sessions\n");
    }

    println!("For more commands:");
    println!("  worktrace --help");
    Ok(())
}
