use std::sync::Arc;

use chrono::{DateTime, Utc};

use worktrace_engine::{ensure_open, paused_ms, replay_session};
use worktrace_store::{Database, TaskRecord};
use worktrace_types::{
    EventKind, EventPayload, ProjectId, Session, SessionEvent, SessionId, TaskId, TenantId,
};

use crate::catalog::{TaskCatalog, require_project, require_task};
use crate::clock::Clock;
use crate::model::{Identity, TaskSessionMetadata};
use crate::{Error, Result};

/// Task activity inside sessions, plus the collaborator-side bookkeeping
/// (status flips, registration) the tracker is allowed to do.
pub struct TaskOps {
    db: Arc<Database>,
    catalog: Arc<dyn TaskCatalog>,
    clock: Arc<dyn Clock>,
}

impl TaskOps {
    pub(crate) fn new(
        db: Arc<Database>,
        catalog: Arc<dyn TaskCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { db, catalog, clock }
    }

    /// Mark the task active in the session from now on.
    pub fn activate(
        &self,
        tenant_id: TenantId,
        session_id: SessionId,
        task_id: TaskId,
    ) -> Result<Session> {
        self.activity(
            tenant_id,
            session_id,
            task_id,
            "activate a task in",
            EventPayload::TaskActivated { task_id },
        )
    }

    /// Remove the task from the session's active set.
    pub fn deactivate(
        &self,
        tenant_id: TenantId,
        session_id: SessionId,
        task_id: TaskId,
    ) -> Result<Session> {
        self.activity(
            tenant_id,
            session_id,
            task_id,
            "deactivate a task in",
            EventPayload::TaskDeactivated { task_id },
        )
    }

    /// Record the task as completed and flip its catalog status to done.
    /// The task stays active in the session until deactivated.
    pub fn mark_done(
        &self,
        tenant_id: TenantId,
        session_id: SessionId,
        task_id: TaskId,
    ) -> Result<Session> {
        let session = self.activity(
            tenant_id,
            session_id,
            task_id,
            "mark a task done in",
            EventPayload::TaskMarkedDone { task_id },
        )?;
        self.catalog.set_task_done(tenant_id, task_id, true)?;
        Ok(session)
    }

    /// Put the task back to todo: catalog status flipped back, and the
    /// task drops out of the session's active set.
    pub fn reset(
        &self,
        tenant_id: TenantId,
        session_id: SessionId,
        task_id: TaskId,
    ) -> Result<Session> {
        let session = self.activity(
            tenant_id,
            session_id,
            task_id,
            "reset a task in",
            EventPayload::TaskReset { task_id },
        )?;
        self.catalog.set_task_done(tenant_id, task_id, false)?;
        Ok(session)
    }

    /// Cross-session rollup for one task over the actor's non-discarded
    /// sessions. Re-runs derivation per session; nothing is cached.
    pub fn stats(&self, identity: Identity, task_id: TaskId) -> Result<TaskSessionMetadata> {
        require_task(self.catalog.as_ref(), identity.tenant_id, task_id)?;

        let now = self.clock.now();
        let sessions = self
            .db
            .sessions_with_task(identity.tenant_id, identity.actor_id, task_id)?;

        let mut meta = TaskSessionMetadata {
            task_id,
            session_count: sessions.len(),
            total_tracked_ms: 0,
            total_paused_ms: 0,
            pause_count: 0,
            last_session_at: None,
            last_session_task_ms: 0,
        };

        // (timestamp of the latest task-referencing event, its session's
        // started_at, that session's task time)
        let mut latest: Option<(DateTime<Utc>, DateTime<Utc>, i64)> = None;

        for session in sessions {
            let events = self.db.events_for_session(session.id)?;
            let replay = replay_session(&session, &events, now);
            let task_ms = replay
                .tasks
                .get(&task_id)
                .map(|entry| entry.active_ms)
                .unwrap_or(0);

            meta.total_tracked_ms += task_ms;
            meta.total_paused_ms += paused_ms(
                session.started_at,
                session.ended_at,
                replay.totals.effective_ms,
                now,
            );
            meta.pause_count += events
                .iter()
                .filter(|event| event.payload.kind() == EventKind::SessionPaused)
                .count();

            let last_reference = events
                .iter()
                .filter(|event| event.payload.task_id() == Some(task_id))
                .map(|event| event.timestamp)
                .max();
            if let Some(at) = last_reference
                && latest.is_none_or(|(best, _, _)| at > best)
            {
                latest = Some((at, session.started_at, task_ms));
            }
        }

        if let Some((_, started_at, task_ms)) = latest {
            meta.last_session_at = Some(started_at);
            meta.last_session_task_ms = task_ms;
        }
        Ok(meta)
    }

    /// Register a task with the catalog.
    pub fn register(
        &self,
        tenant_id: TenantId,
        name: &str,
        project_id: Option<ProjectId>,
    ) -> Result<TaskRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Domain(worktrace_types::Error::Validation(
                "task name must not be empty".to_string(),
            )));
        }
        if let Some(project_id) = project_id {
            require_project(self.catalog.as_ref(), tenant_id, project_id)?;
        }

        let task = TaskRecord {
            id: TaskId::generate(),
            tenant_id,
            name: name.to_string(),
            project_id,
            done: false,
        };
        self.catalog.register_task(&task)?;
        Ok(task)
    }

    pub fn list(&self, tenant_id: TenantId) -> Result<Vec<TaskRecord>> {
        self.catalog.tasks(tenant_id)
    }

    /// Shared path for the four task activity events: open-session guard,
    /// tenant check on the task, then append. The session row itself does
    /// not change.
    fn activity(
        &self,
        tenant_id: TenantId,
        session_id: SessionId,
        task_id: TaskId,
        operation: &'static str,
        payload: EventPayload,
    ) -> Result<Session> {
        let session = self
            .db
            .get_session(tenant_id, session_id, true)?
            .ok_or_else(|| Error::NotFound(format!("session {}", session_id)))?;
        ensure_open(session.status, operation)?;
        require_task(self.catalog.as_ref(), tenant_id, task_id)?;

        let event = SessionEvent::record(
            session.id,
            session.tenant_id,
            session.actor_id,
            self.clock.now(),
            payload,
        );
        self.db.append_event(&session, &event)?;
        Ok(session)
    }
}
