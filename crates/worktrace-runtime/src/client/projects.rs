use std::sync::Arc;

use worktrace_engine::ensure_open;
use worktrace_store::{Database, ProjectRecord};
use worktrace_types::{EventPayload, ProjectId, Session, SessionEvent, SessionId, TenantId};

use crate::catalog::{TaskCatalog, require_project};
use crate::clock::Clock;
use crate::{Error, Result};

/// Project assignment on sessions, plus project registration.
pub struct ProjectOps {
    db: Arc<Database>,
    catalog: Arc<dyn TaskCatalog>,
    clock: Arc<dyn Clock>,
}

impl ProjectOps {
    pub(crate) fn new(
        db: Arc<Database>,
        catalog: Arc<dyn TaskCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { db, catalog, clock }
    }

    /// Add the project to the session. Set semantics: assigning an already
    /// assigned project changes nothing but still records the event.
    pub fn assign(
        &self,
        tenant_id: TenantId,
        session_id: SessionId,
        project_id: ProjectId,
    ) -> Result<Session> {
        let mut session = self.load_open(tenant_id, session_id, "assign a project to")?;
        require_project(self.catalog.as_ref(), tenant_id, project_id)?;

        session.project_ids.insert(project_id);
        let event = SessionEvent::record(
            session.id,
            session.tenant_id,
            session.actor_id,
            self.clock.now(),
            EventPayload::ProjectAssigned { project_id },
        );
        self.db.append_event(&session, &event)?;
        Ok(session)
    }

    pub fn unassign(
        &self,
        tenant_id: TenantId,
        session_id: SessionId,
        project_id: ProjectId,
    ) -> Result<Session> {
        let mut session = self.load_open(tenant_id, session_id, "unassign a project from")?;
        require_project(self.catalog.as_ref(), tenant_id, project_id)?;

        session.project_ids.remove(&project_id);
        let event = SessionEvent::record(
            session.id,
            session.tenant_id,
            session.actor_id,
            self.clock.now(),
            EventPayload::ProjectUnassigned { project_id },
        );
        self.db.append_event(&session, &event)?;
        Ok(session)
    }

    /// Register a project with the catalog.
    pub fn register(&self, tenant_id: TenantId, name: &str) -> Result<ProjectRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Domain(worktrace_types::Error::Validation(
                "project name must not be empty".to_string(),
            )));
        }

        let project = ProjectRecord {
            id: ProjectId::generate(),
            tenant_id,
            name: name.to_string(),
        };
        self.catalog.register_project(&project)?;
        Ok(project)
    }

    pub fn list(&self, tenant_id: TenantId) -> Result<Vec<ProjectRecord>> {
        self.catalog.projects(tenant_id)
    }

    fn load_open(
        &self,
        tenant_id: TenantId,
        session_id: SessionId,
        operation: &'static str,
    ) -> Result<Session> {
        let session = self
            .db
            .get_session(tenant_id, session_id, true)?
            .ok_or_else(|| Error::NotFound(format!("session {}", session_id)))?;
        ensure_open(session.status, operation)?;
        Ok(session)
    }
}
