use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use worktrace_types::{EventPayload, SessionEvent, SessionStatus, TaskId};

// NOTE: Derivation Design
//
// Every duration the system reports is recomputed here from the event log;
// nothing derived is ever persisted. The function is pure: output depends
// only on its arguments (including `now`), so identical calls return
// identical results and the read path never drifts from the log.
//
// The walk treats the log as a sequence of segments between event
// boundaries. A segment is credited while the session clock is running;
// concurrently active tasks each receive the full segment duration (time
// is not split between them), while the on-task total counts the segment
// once.

/// Derived session-level durations, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DurationSummary {
    /// Time the session clock was running between start and flow end
    pub effective_ms: i64,

    /// Portion of effective time with at least one active task, counted
    /// once regardless of how many tasks were active
    pub on_task_ms: i64,

    /// Effective time with no active task: `effective_ms - on_task_ms`
    pub unallocated_ms: i64,

    /// Whether more than one task was ever active during a running segment
    pub has_overlap: bool,
}

/// Derived per-task values for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub task_id: TaskId,

    /// Running time credited while this task was active; concurrent tasks
    /// each get full credit
    pub active_ms: i64,

    /// The task was activated at least once
    pub was_active: bool,

    /// The task was marked done and not reset afterwards
    pub was_completed: bool,

    /// Timestamp of the first activation seen in the log
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_activated_at: Option<DateTime<Utc>>,
}

impl TaskSummary {
    fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            active_ms: 0,
            was_active: false,
            was_completed: false,
            first_activated_at: None,
        }
    }
}

/// Full derivation output: session totals plus one entry per task seen in
/// the log. The map is ordered so iteration is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Replay {
    pub totals: DurationSummary,
    pub tasks: BTreeMap<TaskId, TaskSummary>,
}

/// Replay a session's event log into derived durations.
///
/// `flow_end` is `ended_at` for terminal sessions and `now` for open ones:
/// an open session is evaluated as if it ended right now, without touching
/// persisted state. When `flow_end <= started_at` everything derives to
/// zero.
pub fn replay(
    status: SessionStatus,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    events: &[SessionEvent],
    now: DateTime<Utc>,
) -> Replay {
    let flow_end = if status.is_terminal() {
        // ended_at is always set for terminal sessions; a missing value
        // means a damaged row, evaluated as still flowing
        ended_at.unwrap_or(now)
    } else {
        now
    };

    if flow_end <= started_at {
        return Replay::default();
    }

    // Store invariant already guarantees order; re-sort defensively. The
    // sort is stable, so equal timestamps keep insertion order.
    let mut ordered: Vec<&SessionEvent> = events.iter().collect();
    ordered.sort_by_key(|event| event.timestamp);

    let mut totals = DurationSummary::default();
    let mut tasks: BTreeMap<TaskId, TaskSummary> = BTreeMap::new();
    let mut active: BTreeSet<TaskId> = BTreeSet::new();

    if ordered.is_empty() {
        // Degenerate single-segment case: the clock state is whatever the
        // status says.
        let running = status == SessionStatus::Running;
        credit_segment(&mut totals, &mut tasks, &active, running, started_at, flow_end);
        totals.unallocated_ms = totals.effective_ms - totals.on_task_ms;
        return Replay { totals, tasks };
    }

    // With events present the clock starts off; the first
    // started/resumed event in the trail turns it on.
    let mut running = false;
    let mut cursor = started_at;

    for event in &ordered {
        let boundary = event.timestamp.min(flow_end);
        credit_segment(&mut totals, &mut tasks, &active, running, cursor, boundary);
        apply_event(event, &mut running, &mut active, &mut tasks);
        cursor = cursor.max(boundary);
    }
    credit_segment(&mut totals, &mut tasks, &active, running, cursor, flow_end);

    totals.unallocated_ms = totals.effective_ms - totals.on_task_ms;
    Replay { totals, tasks }
}

/// Credit one segment of wall time to the totals and to every active task.
fn credit_segment(
    totals: &mut DurationSummary,
    tasks: &mut BTreeMap<TaskId, TaskSummary>,
    active: &BTreeSet<TaskId>,
    running: bool,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) {
    let ms = (to - from).num_milliseconds().max(0);
    if ms == 0 || !running {
        return;
    }

    totals.effective_ms += ms;
    if active.is_empty() {
        return;
    }

    totals.on_task_ms += ms;
    if active.len() > 1 {
        totals.has_overlap = true;
    }
    for task_id in active {
        tasks
            .entry(*task_id)
            .or_insert_with(|| TaskSummary::new(*task_id))
            .active_ms += ms;
    }
}

/// Apply one event's effect to the replay state.
fn apply_event(
    event: &SessionEvent,
    running: &mut bool,
    active: &mut BTreeSet<TaskId>,
    tasks: &mut BTreeMap<TaskId, TaskSummary>,
) {
    match &event.payload {
        EventPayload::SessionStarted { .. } | EventPayload::SessionResumed => {
            *running = true;
        }
        EventPayload::SessionPaused => {
            *running = false;
        }
        EventPayload::SessionFinished { .. } | EventPayload::SessionCancelled { .. } => {
            // Activity cannot continue past session end
            *running = false;
            active.clear();
        }
        EventPayload::TaskActivated { task_id } => {
            active.insert(*task_id);
            let entry = tasks
                .entry(*task_id)
                .or_insert_with(|| TaskSummary::new(*task_id));
            entry.was_active = true;
            if entry.first_activated_at.is_none() {
                entry.first_activated_at = Some(event.timestamp);
            }
        }
        EventPayload::TaskDeactivated { task_id } => {
            active.remove(task_id);
            tasks
                .entry(*task_id)
                .or_insert_with(|| TaskSummary::new(*task_id));
        }
        EventPayload::TaskMarkedDone { task_id } => {
            tasks
                .entry(*task_id)
                .or_insert_with(|| TaskSummary::new(*task_id))
                .was_completed = true;
        }
        EventPayload::TaskReset { task_id } => {
            // Back to todo: deactivates and clears the completion marker
            active.remove(task_id);
            tasks
                .entry(*task_id)
                .or_insert_with(|| TaskSummary::new(*task_id))
                .was_completed = false;
        }
        EventPayload::StepLogged { .. }
        | EventPayload::ProjectAssigned { .. }
        | EventPayload::ProjectUnassigned { .. } => {
            // Segment boundary only; no replay state change
        }
    }
}
