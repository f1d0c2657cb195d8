use worktrace_engine::{DurationSummary, ProjectSummary, TaskSummary};
use worktrace_runtime::{SessionOverview, SessionView, TaskSessionMetadata};
use worktrace_types::{EventPayload, Session};

use super::time::{format_ms, format_relative};
use super::{short_id, status_label};

/// One-line confirmation after a lifecycle or activity mutation.
pub fn print_transition(verb: &str, session: &Session) {
    println!(
        "{} session {} [{}]",
        verb,
        short_id(session.id),
        status_label(session.status)
    );
}

/// Compact session line for `session current`.
pub fn print_brief(session: &Session) {
    println!(
        "{}  {}  started {}",
        short_id(session.id),
        status_label(session.status),
        format_relative(session.started_at)
    );
    if let Some(summary) = &session.summary {
        println!("  summary: {}", summary);
    }
}

/// Full detail for `session show`: row, derived durations, rollups, log.
pub fn print_view(view: &SessionView) {
    let session = &view.session;

    println!("Session {}", session.id);
    println!("  status:   {}", status_label(session.status));
    println!("  started:  {}", session.started_at.to_rfc3339());
    if let Some(ended) = session.ended_at {
        println!("  ended:    {}", ended.to_rfc3339());
    }
    if let Some(summary) = &session.summary {
        println!("  summary:  {}", summary);
    }
    if session.excluded_from_summaries {
        println!("  excluded from summaries");
    }
    if session.is_deleted {
        println!("  discarded");
    }

    println!();
    print_durations(&view.durations);

    if !view.tasks.is_empty() {
        println!();
        print_task_rollup(&view.tasks);
    }

    if !view.projects.is_empty() {
        println!();
        print_project_rollup(&view.projects);
    }

    println!();
    println!("Events:");
    for event in &view.events {
        println!(
            "  {}  {}",
            event.timestamp.format("%H:%M:%S"),
            describe_event(&event.payload)
        );
    }
}

/// Session table for `session list`, newest first.
pub fn print_overview_table(overviews: &[SessionOverview]) {
    if overviews.is_empty() {
        println!("No sessions found.");
        return;
    }

    println!(
        "{:<10} {:<11} {:<16} {:>10} {:>10}",
        "ID", "STATUS", "STARTED", "EFFECTIVE", "ON TASK"
    );
    println!("{}", "-".repeat(62));

    for overview in overviews {
        let session = &overview.session;
        println!(
            "{:<10} {:<11} {:<16} {:>10} {:>10}",
            short_id(session.id),
            status_label(session.status),
            format_relative(session.started_at),
            format_ms(overview.durations.effective_ms),
            format_ms(overview.durations.on_task_ms)
        );
    }
}

/// Cross-session totals for `task stats`.
pub fn print_task_stats(stats: &TaskSessionMetadata) {
    println!("Task {} across sessions:", short_id(stats.task_id));
    println!("  sessions:     {}", stats.session_count);
    println!("  tracked:      {}", format_ms(stats.total_tracked_ms));
    println!("  paused:       {}", format_ms(stats.total_paused_ms));
    println!("  pauses:       {}", stats.pause_count);

    match stats.last_session_at {
        Some(at) => println!(
            "  last session: {} ({} on this task)",
            format_relative(at),
            format_ms(stats.last_session_task_ms)
        ),
        None => println!("  last session: never"),
    }
}

fn print_durations(durations: &DurationSummary) {
    println!("Durations (derived at read time):");
    println!("  effective:   {}", format_ms(durations.effective_ms));
    println!("  on task:     {}", format_ms(durations.on_task_ms));
    println!("  unallocated: {}", format_ms(durations.unallocated_ms));
    if durations.has_overlap {
        println!("  note: tasks overlapped; per-task times can exceed the session total");
    }
}

fn print_task_rollup(tasks: &[TaskSummary]) {
    println!("{:<10} {:>10}  FLAGS", "TASK", "ACTIVE");
    for entry in tasks {
        let mut flags = Vec::new();
        if entry.was_active {
            flags.push("active");
        }
        if entry.was_completed {
            flags.push("done");
        }
        println!(
            "{:<10} {:>10}  {}",
            short_id(entry.task_id),
            format_ms(entry.active_ms),
            flags.join(", ")
        );
    }
}

fn print_project_rollup(projects: &[ProjectSummary]) {
    println!("{:<10} {:>10}", "PROJECT", "ACTIVE");
    for entry in projects {
        println!(
            "{:<10} {:>10}",
            short_id(entry.project_id),
            format_ms(entry.active_ms)
        );
    }
}

fn describe_event(payload: &EventPayload) -> String {
    match payload {
        EventPayload::SessionStarted { project_ids } if project_ids.is_empty() => {
            "started".to_string()
        }
        EventPayload::SessionStarted { project_ids } => {
            format!("started with {} project(s)", project_ids.len())
        }
        EventPayload::SessionPaused => "paused".to_string(),
        EventPayload::SessionResumed => "resumed".to_string(),
        EventPayload::SessionFinished { summary: None } => "finished".to_string(),
        EventPayload::SessionFinished {
            summary: Some(summary),
        } => format!("finished: {}", summary),
        EventPayload::SessionCancelled { mode: None } => "cancelled".to_string(),
        EventPayload::SessionCancelled { mode: Some(mode) } => {
            format!("cancelled ({})", mode)
        }
        EventPayload::TaskActivated { task_id } => {
            format!("task {} activated", short_id(task_id))
        }
        EventPayload::TaskDeactivated { task_id } => {
            format!("task {} deactivated", short_id(task_id))
        }
        EventPayload::TaskMarkedDone { task_id } => {
            format!("task {} marked done", short_id(task_id))
        }
        EventPayload::TaskReset { task_id } => format!("task {} reset", short_id(task_id)),
        EventPayload::StepLogged { text } => format!("step: {}", text),
        EventPayload::ProjectAssigned { project_id } => {
            format!("project {} assigned", short_id(project_id))
        }
        EventPayload::ProjectUnassigned { project_id } => {
            format!("project {} unassigned", short_id(project_id))
        }
    }
}
