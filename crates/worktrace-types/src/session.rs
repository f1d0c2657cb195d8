use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::ids::{ActorId, ProjectId, SessionId, TenantId};

/// Lifecycle state of a work session.
///
/// `Running` and `Paused` are open states; `Finished` and `Cancelled` are
/// terminal and permanent. There is no stored "no session" state: an actor
/// without an open row simply has no active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Running,
    Paused,
    Finished,
    Cancelled,
}

impl SessionStatus {
    /// Terminal states accept no further lifecycle or activity events
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Finished | SessionStatus::Cancelled)
    }

    /// Open states (running or paused) still accept events
    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Running => "running",
            SessionStatus::Paused => "paused",
            SessionStatus::Finished => "finished",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "running" => Some(SessionStatus::Running),
            "paused" => Some(SessionStatus::Paused),
            "finished" => Some(SessionStatus::Finished),
            "cancelled" => Some(SessionStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a cancelled session should be treated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelMode {
    /// Soft-delete the session: hidden from listings and summaries,
    /// retrievable only on explicit request
    Discard,
    /// Keep the session visible but exclude it from summaries
    KeepExcluded,
}

impl CancelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CancelMode::Discard => "discard",
            CancelMode::KeepExcluded => "keep_excluded",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "discard" => Some(CancelMode::Discard),
            "keep_excluded" => Some(CancelMode::KeepExcluded),
            _ => None,
        }
    }
}

impl fmt::Display for CancelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tracked work session.
///
/// The row is a snapshot of lifecycle state; every duration shown to a user
/// is re-derived from the session's event log, never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier
    pub id: SessionId,

    /// Tenant that owns the session; all reads and writes are scoped to it
    pub tenant_id: TenantId,

    /// Actor the session belongs to. An actor has at most one open
    /// (running or paused) session per tenant.
    pub actor_id: ActorId,

    /// Current lifecycle state
    pub status: SessionStatus,

    /// When the session was started (server clock)
    pub started_at: DateTime<Utc>,

    /// When the session reached a terminal state; None while open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    /// Cancel mode recorded at cancellation, if any was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_mode: Option<CancelMode>,

    /// When the session was cancelled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,

    /// When the session was discarded (cancel with `Discard`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discarded_at: Option<DateTime<Utc>>,

    /// Free-text summary captured at finish
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Projects assigned to the session. Set semantics: assigning an
    /// already-present project or unassigning an absent one is a no-op.
    #[serde(default)]
    pub project_ids: BTreeSet<ProjectId>,

    /// Excluded from cross-session summaries (cancel with `KeepExcluded`)
    #[serde(default)]
    pub excluded_from_summaries: bool,

    /// Soft-delete marker. Discarded sessions stay in storage but are
    /// invisible to queries unless explicitly requested.
    #[serde(default)]
    pub is_deleted: bool,
}

impl Session {
    /// Create a new running session starting now
    pub fn start(
        tenant_id: TenantId,
        actor_id: ActorId,
        project_ids: BTreeSet<ProjectId>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SessionId::generate(),
            tenant_id,
            actor_id,
            status: SessionStatus::Running,
            started_at,
            ended_at: None,
            cancel_mode: None,
            cancelled_at: None,
            discarded_at: None,
            summary: None,
            project_ids,
            excluded_from_summaries: false,
            is_deleted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_terminality() {
        assert!(!SessionStatus::Running.is_terminal());
        assert!(!SessionStatus::Paused.is_terminal());
        assert!(SessionStatus::Finished.is_terminal());
        assert!(SessionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in [
            SessionStatus::Running,
            SessionStatus::Paused,
            SessionStatus::Finished,
            SessionStatus::Cancelled,
        ] {
            assert_eq!(SessionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SessionStatus::parse("unknown"), None);
    }

    #[test]
    fn test_cancel_mode_round_trip() {
        for mode in [CancelMode::Discard, CancelMode::KeepExcluded] {
            assert_eq!(CancelMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(CancelMode::parse(""), None);
    }

    #[test]
    fn test_start_produces_open_session() {
        let session = Session::start(
            TenantId::generate(),
            ActorId::generate(),
            BTreeSet::new(),
            Utc::now(),
        );
        assert_eq!(session.status, SessionStatus::Running);
        assert!(session.ended_at.is_none());
        assert!(!session.is_deleted);
    }
}
