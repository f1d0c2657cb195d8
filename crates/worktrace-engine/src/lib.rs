// Engine module - lifecycle rules and time derivation
// This layer sits between persisted sessions/events (types, store) and the
// service/CLI surface. Everything here is pure: no clock, no storage.

pub mod lifecycle;
pub mod replay;
pub mod report;

pub use lifecycle::{LifecycleAction, apply, ensure_open, ensure_startable};
pub use replay::{DurationSummary, Replay, TaskSummary, replay};
pub use report::{ProjectSummary, paused_ms, project_summaries, task_summaries};

use chrono::{DateTime, Utc};
use worktrace_types::{Session, SessionEvent};

// Façade API - stable entry points for the service layer

/// Replay a session's event log into derived durations.
pub fn replay_session(session: &Session, events: &[SessionEvent], now: DateTime<Utc>) -> Replay {
    replay::replay(
        session.status,
        session.started_at,
        session.ended_at,
        events,
        now,
    )
}
