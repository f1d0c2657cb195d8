use chrono::{DateTime, Utc};
use serde::Serialize;

use worktrace_engine::{DurationSummary, ProjectSummary, TaskSummary};
use worktrace_types::{ActorId, Session, SessionEvent, SessionStatus, TaskId, TenantId};

/// Tenant + actor pair every scoped operation runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub tenant_id: TenantId,
    pub actor_id: ActorId,
}

#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub status: Option<SessionStatus>,
    pub include_discarded: bool,
}

impl SessionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: SessionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn include_discarded(mut self) -> Self {
        self.include_discarded = true;
        self
    }
}

/// One session with everything derived from its log: the full event list,
/// the duration totals, and the per-task / per-project rollups, all
/// evaluated at a single instant.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session: Session,
    pub events: Vec<SessionEvent>,
    pub durations: DurationSummary,
    pub tasks: Vec<TaskSummary>,
    pub projects: Vec<ProjectSummary>,
    pub evaluated_at: DateTime<Utc>,
}

/// List row: the session plus its derived totals, so callers never
/// re-derive.
#[derive(Debug, Clone, Serialize)]
pub struct SessionOverview {
    pub session: Session,
    pub durations: DurationSummary,
}

/// Cross-session rollup for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSessionMetadata {
    pub task_id: TaskId,
    pub session_count: usize,
    /// Sum of this task's active time across all of the actor's sessions
    /// that reference it.
    pub total_tracked_ms: i64,
    /// Sum of those sessions' paused time.
    pub total_paused_ms: i64,
    /// SessionPaused events across those sessions.
    pub pause_count: usize,
    /// `started_at` of the session holding the most recent event that
    /// references this task.
    pub last_session_at: Option<DateTime<Utc>>,
    /// That session's active time for this task.
    pub last_session_task_ms: i64,
}
