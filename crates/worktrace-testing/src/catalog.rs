//! In-memory stand-in for the task/project catalog collaborator.

use std::cell::RefCell;
use std::collections::BTreeMap;

use worktrace_runtime::{Error, Result, TaskCatalog};
use worktrace_store::{ProjectRecord, TaskRecord};
use worktrace_types::{ProjectId, TaskId, TenantId};

/// Catalog backed by plain maps. Mirrors the store-backed catalog's
/// semantics, in particular that flipping a task under the wrong tenant is
/// `NotFound`.
#[derive(Default)]
pub struct MemoryCatalog {
    tasks: RefCell<BTreeMap<TaskId, TaskRecord>>,
    projects: RefCell<BTreeMap<ProjectId, ProjectRecord>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a task directly, bypassing registration validation.
    pub fn insert_task(&self, task: TaskRecord) {
        self.tasks.borrow_mut().insert(task.id, task);
    }

    pub fn insert_project(&self, project: ProjectRecord) {
        self.projects.borrow_mut().insert(project.id, project);
    }
}

impl TaskCatalog for MemoryCatalog {
    fn register_task(&self, task: &TaskRecord) -> Result<()> {
        self.insert_task(task.clone());
        Ok(())
    }

    fn register_project(&self, project: &ProjectRecord) -> Result<()> {
        self.insert_project(project.clone());
        Ok(())
    }

    fn task(&self, task_id: TaskId) -> Result<Option<TaskRecord>> {
        Ok(self.tasks.borrow().get(&task_id).cloned())
    }

    fn project(&self, project_id: ProjectId) -> Result<Option<ProjectRecord>> {
        Ok(self.projects.borrow().get(&project_id).cloned())
    }

    fn set_task_done(&self, tenant_id: TenantId, task_id: TaskId, done: bool) -> Result<()> {
        let mut tasks = self.tasks.borrow_mut();
        match tasks.get_mut(&task_id) {
            Some(task) if task.tenant_id == tenant_id => {
                task.done = done;
                Ok(())
            }
            _ => Err(Error::NotFound(format!("task {}", task_id))),
        }
    }

    fn tasks(&self, tenant_id: TenantId) -> Result<Vec<TaskRecord>> {
        let mut tasks: Vec<TaskRecord> = self
            .tasks
            .borrow()
            .values()
            .filter(|task| task.tenant_id == tenant_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tasks)
    }

    fn projects(&self, tenant_id: TenantId) -> Result<Vec<ProjectRecord>> {
        let mut projects: Vec<ProjectRecord> = self
            .projects
            .borrow()
            .values()
            .filter(|project| project.tenant_id == tenant_id)
            .cloned()
            .collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }
}
