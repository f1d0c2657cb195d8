use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{ActorId, EventId, ProjectId, SessionId, TaskId, TenantId};
use crate::session::CancelMode;

// NOTE: Event Log Design
//
// 1. Append-only: events are the source of truth for everything time-shaped.
//    The session row carries lifecycle state; durations are always replayed
//    from the log, never cached.
//
// 2. Server timestamps are authoritative: `timestamp` is assigned by the
//    server clock at append time and must be strictly greater than the
//    previous event's. `client_timestamp` is advisory diagnostics only and
//    is never consulted for ordering or derivation.
//
// 3. Replayability: the payload union carries everything needed to
//    reconstruct replay state (running flag, active task set, project set),
//    so a session can be re-derived from its log alone.

/// Event type and content, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content")]
#[serde(rename_all = "snake_case")]
pub enum EventPayload {
    /// Session created and running. Carries the initial project set so the
    /// log alone reconstructs the session's assignments.
    SessionStarted {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        project_ids: Vec<ProjectId>,
    },

    /// Clock stopped; session remains open
    SessionPaused,

    /// Clock restarted after a pause
    SessionResumed,

    /// Session completed normally. Terminal.
    SessionFinished {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        summary: Option<String>,
    },

    /// Session abandoned. Terminal.
    SessionCancelled {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mode: Option<CancelMode>,
    },

    /// Task added to the active set; concurrent active tasks are allowed
    TaskActivated { task_id: TaskId },

    /// Task removed from the active set
    TaskDeactivated { task_id: TaskId },

    /// Task marked done; its activation state is unchanged
    TaskMarkedDone { task_id: TaskId },

    /// Task returned to todo; also removes it from the active set
    TaskReset { task_id: TaskId },

    /// Free-form progress note
    StepLogged { text: String },

    /// Project added to the session's project set
    ProjectAssigned { project_id: ProjectId },

    /// Project removed from the session's project set
    ProjectUnassigned { project_id: ProjectId },
}

impl EventPayload {
    /// The fieldless kind of this payload, used for storage and filtering
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::SessionStarted { .. } => EventKind::SessionStarted,
            EventPayload::SessionPaused => EventKind::SessionPaused,
            EventPayload::SessionResumed => EventKind::SessionResumed,
            EventPayload::SessionFinished { .. } => EventKind::SessionFinished,
            EventPayload::SessionCancelled { .. } => EventKind::SessionCancelled,
            EventPayload::TaskActivated { .. } => EventKind::TaskActivated,
            EventPayload::TaskDeactivated { .. } => EventKind::TaskDeactivated,
            EventPayload::TaskMarkedDone { .. } => EventKind::TaskMarkedDone,
            EventPayload::TaskReset { .. } => EventKind::TaskReset,
            EventPayload::StepLogged { .. } => EventKind::StepLogged,
            EventPayload::ProjectAssigned { .. } => EventKind::ProjectAssigned,
            EventPayload::ProjectUnassigned { .. } => EventKind::ProjectUnassigned,
        }
    }

    /// Task referenced by this event, if any
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            EventPayload::TaskActivated { task_id }
            | EventPayload::TaskDeactivated { task_id }
            | EventPayload::TaskMarkedDone { task_id }
            | EventPayload::TaskReset { task_id } => Some(*task_id),
            _ => None,
        }
    }

    /// Project referenced by this event, if any
    pub fn project_id(&self) -> Option<ProjectId> {
        match self {
            EventPayload::ProjectAssigned { project_id }
            | EventPayload::ProjectUnassigned { project_id } => Some(*project_id),
            _ => None,
        }
    }
}

/// Fieldless mirror of [`EventPayload`] for indexed storage columns and
/// kind-based filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SessionStarted,
    SessionPaused,
    SessionResumed,
    SessionFinished,
    SessionCancelled,
    TaskActivated,
    TaskDeactivated,
    TaskMarkedDone,
    TaskReset,
    StepLogged,
    ProjectAssigned,
    ProjectUnassigned,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::SessionStarted => "session_started",
            EventKind::SessionPaused => "session_paused",
            EventKind::SessionResumed => "session_resumed",
            EventKind::SessionFinished => "session_finished",
            EventKind::SessionCancelled => "session_cancelled",
            EventKind::TaskActivated => "task_activated",
            EventKind::TaskDeactivated => "task_deactivated",
            EventKind::TaskMarkedDone => "task_marked_done",
            EventKind::TaskReset => "task_reset",
            EventKind::StepLogged => "step_logged",
            EventKind::ProjectAssigned => "project_assigned",
            EventKind::ProjectUnassigned => "project_unassigned",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "session_started" => Some(EventKind::SessionStarted),
            "session_paused" => Some(EventKind::SessionPaused),
            "session_resumed" => Some(EventKind::SessionResumed),
            "session_finished" => Some(EventKind::SessionFinished),
            "session_cancelled" => Some(EventKind::SessionCancelled),
            "task_activated" => Some(EventKind::TaskActivated),
            "task_deactivated" => Some(EventKind::TaskDeactivated),
            "task_marked_done" => Some(EventKind::TaskMarkedDone),
            "task_reset" => Some(EventKind::TaskReset),
            "step_logged" => Some(EventKind::StepLogged),
            "project_assigned" => Some(EventKind::ProjectAssigned),
            "project_unassigned" => Some(EventKind::ProjectUnassigned),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Session event
/// Maps 1:1 to a database table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    /// Unique event ID
    pub id: EventId,

    /// Session the event belongs to
    pub session_id: SessionId,

    /// Tenant scope, denormalized for scoped queries
    pub tenant_id: TenantId,

    /// Actor that caused the event
    pub actor_id: ActorId,

    /// Server-assigned timestamp (UTC); authoritative ordering key,
    /// strictly increasing within a session
    pub timestamp: DateTime<Utc>,

    /// Client-reported timestamp, advisory only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_timestamp: Option<DateTime<Utc>>,

    /// Event type and content (flattened enum)
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl SessionEvent {
    /// Build an event for a session at the given server time
    pub fn record(
        session_id: SessionId,
        tenant_id: TenantId,
        actor_id: ActorId,
        timestamp: DateTime<Utc>,
        payload: EventPayload,
    ) -> Self {
        Self {
            id: EventId::generate(),
            session_id,
            tenant_id,
            actor_id,
            timestamp,
            client_timestamp: None,
            payload,
        }
    }

    /// Attach an advisory client timestamp
    pub fn with_client_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.client_timestamp = Some(at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization() {
        let event = SessionEvent::record(
            SessionId::generate(),
            TenantId::generate(),
            ActorId::generate(),
            Utc::now(),
            EventPayload::TaskActivated {
                task_id: TaskId::generate(),
            },
        );

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: SessionEvent = serde_json::from_str(&json).unwrap();

        match deserialized.payload {
            EventPayload::TaskActivated { task_id } => {
                assert_eq!(Some(task_id), event.payload.task_id())
            }
            _ => panic!("Wrong payload type"),
        }
    }

    #[test]
    fn test_payload_tagging() {
        let payload = EventPayload::StepLogged {
            text: "wrote the parser".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "step_logged");
        assert_eq!(json["content"]["text"], "wrote the parser");
    }

    #[test]
    fn test_unit_payload_tagging() {
        let json = serde_json::to_value(EventPayload::SessionPaused).unwrap();
        assert_eq!(json["type"], "session_paused");

        let parsed: EventPayload =
            serde_json::from_value(serde_json::json!({ "type": "session_paused" })).unwrap();
        assert_eq!(parsed.kind(), EventKind::SessionPaused);
    }

    #[test]
    fn test_kind_string_round_trip() {
        let kinds = [
            EventKind::SessionStarted,
            EventKind::SessionPaused,
            EventKind::SessionResumed,
            EventKind::SessionFinished,
            EventKind::SessionCancelled,
            EventKind::TaskActivated,
            EventKind::TaskDeactivated,
            EventKind::TaskMarkedDone,
            EventKind::TaskReset,
            EventKind::StepLogged,
            EventKind::ProjectAssigned,
            EventKind::ProjectUnassigned,
        ];
        for kind in kinds {
            assert_eq!(EventKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::parse("nope"), None);
    }
}
