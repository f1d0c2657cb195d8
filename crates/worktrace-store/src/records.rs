use serde::{Deserialize, Serialize};

use worktrace_types::{ProjectId, TaskId, TenantId};

/// Catalog row for a task.
///
/// The tracker consumes only the collaborator surface of the catalog:
/// fetch by id, verify tenant, flip `done`, and follow `project_id` for
/// project rollups. Everything else about tasks lives outside this system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub tenant_id: TenantId,
    pub name: String,
    /// Owning project, if the task belongs to one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    pub done: bool,
}

/// Catalog row for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub tenant_id: TenantId,
    pub name: String,
}
