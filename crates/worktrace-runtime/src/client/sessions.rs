use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use worktrace_engine::{
    LifecycleAction, apply, ensure_startable, project_summaries, replay_session, task_summaries,
};
use worktrace_store::Database;
use worktrace_types::{
    CancelMode, EventPayload, ProjectId, Session, SessionEvent, SessionId, TenantId,
};

use crate::catalog::{TaskCatalog, require_project};
use crate::clock::Clock;
use crate::model::{Identity, SessionFilter, SessionOverview, SessionView};
use crate::{Error, Result};

/// Session lifecycle operations. Every mutation loads the session, runs the
/// lifecycle guard, and commits the updated row together with its event in
/// one store transaction.
pub struct SessionOps {
    db: Arc<Database>,
    catalog: Arc<dyn TaskCatalog>,
    clock: Arc<dyn Clock>,
}

impl SessionOps {
    pub(crate) fn new(
        db: Arc<Database>,
        catalog: Arc<dyn TaskCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { db, catalog, clock }
    }

    /// Start a new session for the identity, optionally pre-assigned to
    /// projects. Fails with `ActiveSessionExists` while a Running or Paused
    /// session is open for the same actor.
    pub fn start(&self, identity: Identity, project_ids: Vec<ProjectId>) -> Result<Session> {
        for project_id in &project_ids {
            require_project(self.catalog.as_ref(), identity.tenant_id, *project_id)?;
        }

        let open = self
            .db
            .find_active_session(identity.tenant_id, identity.actor_id)?;
        ensure_startable(open.map(|existing| existing.id))?;

        let now = self.clock.now();
        let session = Session::start(
            identity.tenant_id,
            identity.actor_id,
            project_ids.into_iter().collect(),
            now,
        );
        let opening = SessionEvent::record(
            session.id,
            session.tenant_id,
            session.actor_id,
            now,
            EventPayload::SessionStarted {
                project_ids: session.project_ids.iter().copied().collect(),
            },
        );

        // The partial unique index backstops the check above, so a lost
        // race between two starts still cannot produce two open sessions.
        self.db.create_session(&session, &opening)?;
        Ok(session)
    }

    pub fn pause(&self, tenant_id: TenantId, session_id: SessionId) -> Result<Session> {
        let mut session = self.load(tenant_id, session_id)?;
        session.status = apply(session.status, LifecycleAction::Pause)?;

        let event = self.event(&session, EventPayload::SessionPaused);
        self.db.append_event(&session, &event)?;
        Ok(session)
    }

    pub fn resume(&self, tenant_id: TenantId, session_id: SessionId) -> Result<Session> {
        let mut session = self.load(tenant_id, session_id)?;
        session.status = apply(session.status, LifecycleAction::Resume)?;

        let event = self.event(&session, EventPayload::SessionResumed);
        self.db.append_event(&session, &event)?;
        Ok(session)
    }

    /// Finish the session. A blank summary counts as no summary.
    pub fn finish(
        &self,
        tenant_id: TenantId,
        session_id: SessionId,
        summary: Option<String>,
    ) -> Result<Session> {
        let mut session = self.load(tenant_id, session_id)?;
        session.status = apply(session.status, LifecycleAction::Finish)?;

        let summary = summary
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let event = self.event(
            &session,
            EventPayload::SessionFinished {
                summary: summary.clone(),
            },
        );
        session.ended_at = Some(event.timestamp);
        session.summary = summary;

        self.db.append_event(&session, &event)?;
        Ok(session)
    }

    /// Cancel the session. `Discard` soft-deletes it (hidden from listings,
    /// retrievable via `include_discarded`); `KeepExcluded` keeps it but
    /// marks it excluded from summaries; `None` is a plain cancel.
    pub fn cancel(
        &self,
        tenant_id: TenantId,
        session_id: SessionId,
        mode: Option<CancelMode>,
    ) -> Result<Session> {
        let mut session = self.load(tenant_id, session_id)?;
        session.status = apply(session.status, LifecycleAction::Cancel)?;

        let event = self.event(&session, EventPayload::SessionCancelled { mode });
        let now = event.timestamp;

        session.ended_at = Some(now);
        session.cancelled_at = Some(now);
        session.cancel_mode = mode;
        match mode {
            Some(CancelMode::Discard) => {
                session.discarded_at = Some(now);
                session.is_deleted = true;
            }
            Some(CancelMode::KeepExcluded) => {
                session.excluded_from_summaries = true;
            }
            None => {}
        }

        self.db.append_event(&session, &event)?;
        Ok(session)
    }

    /// Log a free-text step note into an open session.
    pub fn log_step(
        &self,
        tenant_id: TenantId,
        session_id: SessionId,
        text: &str,
    ) -> Result<Session> {
        let session = self.load(tenant_id, session_id)?;
        worktrace_engine::ensure_open(session.status, "log a step in")?;

        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Domain(worktrace_types::Error::Validation(
                "step text must not be empty".to_string(),
            )));
        }

        let event = self.event(
            &session,
            EventPayload::StepLogged {
                text: text.to_string(),
            },
        );
        self.db.append_event(&session, &event)?;
        Ok(session)
    }

    /// The actor's currently open (Running or Paused) session, if any.
    pub fn active(&self, identity: Identity) -> Result<Option<Session>> {
        Ok(self
            .db
            .find_active_session(identity.tenant_id, identity.actor_id)?)
    }

    /// Fetch one session with its full log and derived rollups.
    pub fn get(
        &self,
        tenant_id: TenantId,
        session_id: SessionId,
        include_discarded: bool,
    ) -> Result<Option<SessionView>> {
        let Some(session) = self
            .db
            .get_session(tenant_id, session_id, include_discarded)?
        else {
            return Ok(None);
        };

        Ok(Some(self.view(session, self.clock.now())?))
    }

    /// Sessions of the identity, newest first, each with derived totals
    /// attached. Discarded sessions stay hidden unless asked for.
    pub fn list(&self, identity: Identity, filter: SessionFilter) -> Result<Vec<SessionOverview>> {
        let sessions = self.db.list_sessions(
            identity.tenant_id,
            identity.actor_id,
            filter.status,
            filter.include_discarded,
        )?;

        let now = self.clock.now();
        let mut overviews = Vec::with_capacity(sessions.len());
        for session in sessions {
            let events = self.db.events_for_session(session.id)?;
            let replay = replay_session(&session, &events, now);
            overviews.push(SessionOverview {
                session,
                durations: replay.totals,
            });
        }
        Ok(overviews)
    }

    pub(crate) fn view(&self, session: Session, now: DateTime<Utc>) -> Result<SessionView> {
        let events = self.db.events_for_session(session.id)?;
        let replay = replay_session(&session, &events, now);
        let tasks = task_summaries(&replay);

        // Project rollups need the task -> project mapping for exactly the
        // tasks that appear in the replay.
        let mut mapping = BTreeMap::new();
        for entry in &tasks {
            if let Some(record) = self.catalog.task(entry.task_id)?
                && let Some(project_id) = record.project_id
            {
                mapping.insert(entry.task_id, project_id);
            }
        }
        let projects = project_summaries(&tasks, &mapping);

        Ok(SessionView {
            session,
            events,
            durations: replay.totals,
            tasks,
            projects,
            evaluated_at: now,
        })
    }

    pub(crate) fn load(&self, tenant_id: TenantId, session_id: SessionId) -> Result<Session> {
        self.db
            .get_session(tenant_id, session_id, true)?
            .ok_or_else(|| Error::NotFound(format!("session {}", session_id)))
    }

    fn event(&self, session: &Session, payload: EventPayload) -> SessionEvent {
        SessionEvent::record(
            session.id,
            session.tenant_id,
            session.actor_id,
            self.clock.now(),
            payload,
        )
    }
}
