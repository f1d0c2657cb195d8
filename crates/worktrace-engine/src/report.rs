use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use worktrace_types::{ProjectId, TaskId};

use crate::replay::{Replay, TaskSummary};

/// Derived per-project totals for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project_id: ProjectId,

    /// Sum of `active_ms` over the session's tasks belonging to this project
    pub active_ms: i64,
}

/// Order task summaries for presentation: most time first, ties broken by
/// task id so the order is stable across runs.
pub fn task_summaries(replay: &Replay) -> Vec<TaskSummary> {
    let mut rows: Vec<TaskSummary> = replay.tasks.values().cloned().collect();
    rows.sort_by(|a, b| {
        b.active_ms
            .cmp(&a.active_ms)
            .then_with(|| a.task_id.cmp(&b.task_id))
    });
    rows
}

/// Roll task time up into project buckets.
///
/// `task_projects` maps each task to its owning project; tasks without a
/// project are excluded from project summaries. Sorted like
/// [`task_summaries`].
pub fn project_summaries(
    tasks: &[TaskSummary],
    task_projects: &BTreeMap<TaskId, ProjectId>,
) -> Vec<ProjectSummary> {
    let mut buckets: BTreeMap<ProjectId, i64> = BTreeMap::new();
    for task in tasks {
        if let Some(project_id) = task_projects.get(&task.task_id) {
            *buckets.entry(*project_id).or_insert(0) += task.active_ms;
        }
    }

    let mut rows: Vec<ProjectSummary> = buckets
        .into_iter()
        .map(|(project_id, active_ms)| ProjectSummary {
            project_id,
            active_ms,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.active_ms
            .cmp(&a.active_ms)
            .then_with(|| a.project_id.cmp(&b.project_id))
    });
    rows
}

/// Time a session spent not running: wall span minus effective time,
/// clamped so damaged rows cannot produce negative values.
pub fn paused_ms(
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    effective_ms: i64,
    now: DateTime<Utc>,
) -> i64 {
    let end = ended_at.unwrap_or(now);
    ((end - started_at).num_milliseconds() - effective_ms).max(0)
}
