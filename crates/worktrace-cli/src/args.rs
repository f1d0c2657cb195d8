// NOTE: Command Organization
//
// Commands are grouped by noun (session, task, project, catalog) with one
// verb per subcommand. `step` stays top-level because it is the
// highest-frequency write and deserves the shortest spelling.
//
// Lifecycle and activity commands accept an explicit session id but default
// to the actor's open session, so the common case needs no id at all.
// Mutations print the session row they produced; reads print views derived
// by replaying the event log at that moment. Nothing printed here is stored.

use crate::types::{OutputFormat, StatusFilter};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "worktrace")]
#[command(about = "Track work sessions and see where the time went", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory for the database and config. Defaults to
    /// WORKTRACE_PATH or the platform data dir.
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    /// Tenant to operate as; defaults to the configured tenant
    #[arg(long, global = true)]
    pub tenant: Option<String>,

    /// Actor to operate as; defaults to the configured actor
    #[arg(long, global = true)]
    pub actor: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start, pause, finish, and inspect work sessions")]
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },

    #[command(about = "Track task activity inside a session")]
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },

    #[command(about = "Assign projects to a session")]
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },

    #[command(about = "Register and list tasks and projects")]
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },

    #[command(about = "Log a free-text step note into the open session")]
    Step {
        text: String,

        #[arg(long, help = "Session to log into (defaults to the open session)")]
        session: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SessionCommand {
    #[command(about = "Start a new session (fails if one is already open)")]
    Start {
        #[arg(long = "project", help = "Project to assign at start (repeatable)")]
        projects: Vec<String>,
    },

    #[command(about = "Pause the running session")]
    Pause { session_id: Option<String> },

    #[command(about = "Resume the paused session")]
    Resume { session_id: Option<String> },

    #[command(about = "Finish the session, optionally recording a summary")]
    Finish {
        session_id: Option<String>,

        #[arg(long)]
        summary: Option<String>,
    },

    #[command(about = "Cancel the session")]
    Cancel {
        session_id: Option<String>,

        #[arg(
            long,
            conflicts_with = "keep_excluded",
            help = "Soft-delete: hide the session from listings and summaries"
        )]
        discard: bool,

        #[arg(long, help = "Keep the session visible but leave it out of summaries")]
        keep_excluded: bool,
    },

    #[command(about = "Show the open session, if any")]
    Current,

    #[command(about = "Show one session with its event log and derived durations")]
    Show {
        session_id: String,

        #[arg(long)]
        include_discarded: bool,
    },

    #[command(about = "List sessions, newest first")]
    List {
        #[arg(long)]
        status: Option<StatusFilter>,

        #[arg(long)]
        include_discarded: bool,
    },
}

#[derive(Subcommand)]
pub enum TaskCommand {
    #[command(about = "Mark the task active; it accrues time until deactivated")]
    Activate {
        task_id: String,

        #[arg(long)]
        session: Option<String>,
    },

    #[command(about = "Remove the task from the active set")]
    Deactivate {
        task_id: String,

        #[arg(long)]
        session: Option<String>,
    },

    #[command(about = "Record the task as completed (it keeps accruing while active)")]
    Done {
        task_id: String,

        #[arg(long)]
        session: Option<String>,
    },

    #[command(about = "Reset the task: deactivate it and clear its completion")]
    Reset {
        task_id: String,

        #[arg(long)]
        session: Option<String>,
    },

    #[command(about = "Cross-session totals for the task")]
    Stats { task_id: String },
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    #[command(about = "Assign the project to the session")]
    Assign {
        project_id: String,

        #[arg(long)]
        session: Option<String>,
    },

    #[command(about = "Remove the project from the session")]
    Unassign {
        project_id: String,

        #[arg(long)]
        session: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    #[command(about = "Register a task, optionally under a project")]
    AddTask {
        name: String,

        #[arg(long, help = "Owning project id")]
        project: Option<String>,
    },

    #[command(about = "Register a project")]
    AddProject { name: String },

    #[command(about = "List registered tasks and projects")]
    List,
}
