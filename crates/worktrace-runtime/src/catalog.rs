use worktrace_store::{Database, ProjectRecord, TaskRecord};
use worktrace_types::{ProjectId, TaskId, TenantId};

use crate::{Error, Result};

/// Collaborator surface onto the task/project catalog.
///
/// The tracker never owns tasks or projects; it only needs to register
/// them, fetch one by id to check tenancy, flip a task between done and
/// todo, and map tasks to projects for rollups. Everything else about the
/// catalog is out of scope.
pub trait TaskCatalog {
    fn register_task(&self, task: &TaskRecord) -> Result<()>;
    fn register_project(&self, project: &ProjectRecord) -> Result<()>;
    fn task(&self, task_id: TaskId) -> Result<Option<TaskRecord>>;
    fn project(&self, project_id: ProjectId) -> Result<Option<ProjectRecord>>;
    fn set_task_done(&self, tenant_id: TenantId, task_id: TaskId, done: bool) -> Result<()>;
    fn tasks(&self, tenant_id: TenantId) -> Result<Vec<TaskRecord>>;
    fn projects(&self, tenant_id: TenantId) -> Result<Vec<ProjectRecord>>;
}

/// The local store doubles as the catalog in the single-binary setup.
impl TaskCatalog for Database {
    fn register_task(&self, task: &TaskRecord) -> Result<()> {
        self.upsert_task(task)?;
        Ok(())
    }

    fn register_project(&self, project: &ProjectRecord) -> Result<()> {
        self.upsert_project(project)?;
        Ok(())
    }

    fn task(&self, task_id: TaskId) -> Result<Option<TaskRecord>> {
        Ok(self.get_task(task_id)?)
    }

    fn project(&self, project_id: ProjectId) -> Result<Option<ProjectRecord>> {
        Ok(self.get_project(project_id)?)
    }

    fn set_task_done(&self, tenant_id: TenantId, task_id: TaskId, done: bool) -> Result<()> {
        Database::set_task_done(self, tenant_id, task_id, done)?;
        Ok(())
    }

    fn tasks(&self, tenant_id: TenantId) -> Result<Vec<TaskRecord>> {
        Ok(self.list_tasks(tenant_id)?)
    }

    fn projects(&self, tenant_id: TenantId) -> Result<Vec<ProjectRecord>> {
        Ok(self.list_projects(tenant_id)?)
    }
}

/// Fetch a task and require it to belong to `tenant_id`. A missing task is
/// `NotFound`; a task owned elsewhere is `AccessDenied`, deliberately
/// distinct so a caller cannot confuse the two.
pub(crate) fn require_task(
    catalog: &dyn TaskCatalog,
    tenant_id: TenantId,
    task_id: TaskId,
) -> Result<TaskRecord> {
    let task = catalog
        .task(task_id)?
        .ok_or_else(|| Error::NotFound(format!("task {}", task_id)))?;
    if task.tenant_id != tenant_id {
        return Err(Error::AccessDenied(format!(
            "task {} belongs to another tenant",
            task_id
        )));
    }
    Ok(task)
}

pub(crate) fn require_project(
    catalog: &dyn TaskCatalog,
    tenant_id: TenantId,
    project_id: ProjectId,
) -> Result<ProjectRecord> {
    let project = catalog
        .project(project_id)?
        .ok_or_else(|| Error::NotFound(format!("project {}", project_id)))?;
    if project.tenant_id != tenant_id {
        return Err(Error::AccessDenied(format!(
            "project {} belongs to another tenant",
            project_id
        )));
    }
    Ok(project)
}
