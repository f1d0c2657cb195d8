use std::fs;
use std::path::Path;

use rusqlite::Connection;

use worktrace_types::{
    ActorId, ProjectId, Session, SessionEvent, SessionId, SessionStatus, TaskId, TenantId,
};

use crate::queries;
use crate::records::{ProjectRecord, TaskRecord};
use crate::schema;
use crate::{Error, Result};

/// Handle to one tracker database.
///
/// All mutating calls go through a transaction, so a failed write leaves
/// both the session row and its event log untouched.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `db_path` and bring the schema up
    /// to the current version.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;
        schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Insert a new session together with its opening event.
    ///
    /// The opening event shares the session's start timestamp, so it skips
    /// the strictly-greater check that `append_event` applies. If the actor
    /// already has an open session the write fails with
    /// `ActiveSessionExists` carrying the id of the existing one.
    pub fn create_session(&self, session: &Session, opening: &SessionEvent) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        if let Err(err) = queries::session::insert(&tx, session) {
            if is_open_conflict(&err) {
                let winner = queries::session::find_active(&tx, session.tenant_id, session.actor_id)?
                    .map(|existing| existing.id)
                    .unwrap_or(session.id);
                return Err(Error::Domain(worktrace_types::Error::ActiveSessionExists {
                    session_id: winner,
                }));
            }
            return Err(err);
        }

        queries::event::insert(&tx, opening)?;
        tx.commit()?;
        Ok(())
    }

    /// Append one event and persist the session row it produced, atomically.
    ///
    /// The event's timestamp must be strictly greater than the last event's
    /// (the session start when the log is empty); otherwise nothing is
    /// written and the call fails with `OrderingViolation`.
    pub fn append_event(&self, session: &Session, event: &SessionEvent) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        let stored = queries::session::get(&tx, session.tenant_id, session.id, true)?
            .ok_or_else(|| Error::NotFound(format!("session {}", session.id)))?;

        let last = queries::event::last_timestamp(&tx, session.id)?.unwrap_or(stored.started_at);
        if event.timestamp <= last {
            return Err(Error::Domain(worktrace_types::Error::OrderingViolation {
                last,
                attempted: event.timestamp,
            }));
        }

        queries::event::insert(&tx, event)?;
        queries::session::update(&tx, session)?;
        tx.commit()?;
        Ok(())
    }

    pub fn get_session(
        &self,
        tenant_id: TenantId,
        session_id: SessionId,
        include_discarded: bool,
    ) -> Result<Option<Session>> {
        queries::session::get(&self.conn, tenant_id, session_id, include_discarded)
    }

    pub fn find_active_session(
        &self,
        tenant_id: TenantId,
        actor_id: ActorId,
    ) -> Result<Option<Session>> {
        queries::session::find_active(&self.conn, tenant_id, actor_id)
    }

    pub fn list_sessions(
        &self,
        tenant_id: TenantId,
        actor_id: ActorId,
        status: Option<SessionStatus>,
        include_discarded: bool,
    ) -> Result<Vec<Session>> {
        queries::session::list(&self.conn, tenant_id, actor_id, status, include_discarded)
    }

    /// Sessions of an actor whose event log references the given task.
    pub fn sessions_with_task(
        &self,
        tenant_id: TenantId,
        actor_id: ActorId,
        task_id: TaskId,
    ) -> Result<Vec<Session>> {
        queries::session::list_with_task(&self.conn, tenant_id, actor_id, task_id)
    }

    pub fn events_for_session(&self, session_id: SessionId) -> Result<Vec<SessionEvent>> {
        queries::event::list_for_session(&self.conn, session_id)
    }

    pub fn upsert_task(&self, task: &TaskRecord) -> Result<()> {
        queries::catalog::upsert_task(&self.conn, task)
    }

    pub fn get_task(&self, task_id: TaskId) -> Result<Option<TaskRecord>> {
        queries::catalog::get_task(&self.conn, task_id)
    }

    pub fn set_task_done(&self, tenant_id: TenantId, task_id: TaskId, done: bool) -> Result<()> {
        queries::catalog::set_task_done(&self.conn, tenant_id, task_id, done)
    }

    pub fn list_tasks(&self, tenant_id: TenantId) -> Result<Vec<TaskRecord>> {
        queries::catalog::list_tasks(&self.conn, tenant_id)
    }

    pub fn upsert_project(&self, project: &ProjectRecord) -> Result<()> {
        queries::catalog::upsert_project(&self.conn, project)
    }

    pub fn get_project(&self, project_id: ProjectId) -> Result<Option<ProjectRecord>> {
        queries::catalog::get_project(&self.conn, project_id)
    }

    pub fn list_projects(&self, tenant_id: TenantId) -> Result<Vec<ProjectRecord>> {
        queries::catalog::list_projects(&self.conn, tenant_id)
    }
}

fn is_open_conflict(err: &Error) -> bool {
    match err {
        Error::Database(rusqlite::Error::SqliteFailure(failure, Some(message))) => {
            failure.code == rusqlite::ErrorCode::ConstraintViolation
                && message.contains("idx_sessions_one_open")
        }
        _ => false,
    }
}
