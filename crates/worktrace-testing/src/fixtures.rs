//! Scripted session logs for seeding stores without going through the
//! service layer.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};

use worktrace_store::Database;
use worktrace_types::{
    ActorId, EventPayload, Session, SessionEvent, SessionId, SessionStatus, TenantId,
};

/// Builder for a session plus its event log, offsets in milliseconds from
/// the session start. The opening `SessionStarted` event at offset 0 is
/// always included.
pub struct EventScript {
    tenant_id: TenantId,
    actor_id: ActorId,
    session_id: SessionId,
    started_at: DateTime<Utc>,
    entries: Vec<(i64, EventPayload)>,
}

impl EventScript {
    pub fn starting_at(started_at: DateTime<Utc>) -> Self {
        Self {
            tenant_id: TenantId::generate(),
            actor_id: ActorId::generate(),
            session_id: SessionId::generate(),
            started_at,
            entries: vec![(0, EventPayload::SessionStarted { project_ids: vec![] })],
        }
    }

    pub fn for_identity(mut self, tenant_id: TenantId, actor_id: ActorId) -> Self {
        self.tenant_id = tenant_id;
        self.actor_id = actor_id;
        self
    }

    /// Append an event `offset_ms` after the start. Offsets must be
    /// strictly increasing; the store rejects the script otherwise.
    pub fn then(mut self, offset_ms: i64, payload: EventPayload) -> Self {
        self.entries.push((offset_ms, payload));
        self
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.entries
            .iter()
            .map(|(offset_ms, payload)| {
                SessionEvent::record(
                    self.session_id,
                    self.tenant_id,
                    self.actor_id,
                    self.started_at + Duration::milliseconds(*offset_ms),
                    payload.clone(),
                )
            })
            .collect()
    }

    /// The session row as if still running.
    pub fn running_session(&self) -> Session {
        let mut session = Session::start(
            self.tenant_id,
            self.actor_id,
            Default::default(),
            self.started_at,
        );
        session.id = self.session_id;
        session
    }

    /// The session row as finished at the given offset.
    pub fn finished_session(&self, ended_offset_ms: i64) -> Session {
        let mut session = self.running_session();
        session.status = SessionStatus::Finished;
        session.ended_at = Some(self.started_at + Duration::milliseconds(ended_offset_ms));
        session
    }

    /// Persist the session and its whole log through the store's normal
    /// write path.
    pub fn write(&self, db: &Database, session: &Session) -> Result<()> {
        let events = self.events();
        let (opening, rest) = events
            .split_first()
            .context("script always contains the opening event")?;

        db.create_session(session, opening)?;
        for event in rest {
            db.append_event(session, event)?;
        }
        Ok(())
    }
}
