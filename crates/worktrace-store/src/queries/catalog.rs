use rusqlite::{Connection, OptionalExtension, params};

use worktrace_types::{ProjectId, TaskId, TenantId};

use super::session::decode_id;
use crate::records::{ProjectRecord, TaskRecord};
use crate::{Error, Result};

fn read_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String, Option<String>, bool)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn decode_task(raw: (String, String, String, Option<String>, bool)) -> Result<TaskRecord> {
    let (id, tenant_id, name, project_id, done) = raw;
    Ok(TaskRecord {
        id: decode_id::<TaskId>(&id)?,
        tenant_id: decode_id::<TenantId>(&tenant_id)?,
        name,
        project_id: project_id.as_deref().map(decode_id::<ProjectId>).transpose()?,
        done,
    })
}

pub(crate) fn upsert_task(conn: &Connection, task: &TaskRecord) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO tasks (id, tenant_id, name, project_id, done)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            project_id = excluded.project_id,
            done = excluded.done
        "#,
        params![
            task.id.to_string(),
            task.tenant_id.to_string(),
            task.name,
            task.project_id.map(|id| id.to_string()),
            task.done,
        ],
    )?;
    Ok(())
}

/// Lookup by id alone. Tenant checks belong to the caller, which needs to
/// tell "no such task" apart from "task owned by someone else".
pub(crate) fn get_task(conn: &Connection, task_id: TaskId) -> Result<Option<TaskRecord>> {
    let raw = conn
        .query_row(
            "SELECT id, tenant_id, name, project_id, done FROM tasks WHERE id = ?1",
            [task_id.to_string()],
            read_task,
        )
        .optional()?;

    raw.map(decode_task).transpose()
}

pub(crate) fn set_task_done(
    conn: &Connection,
    tenant_id: TenantId,
    task_id: TaskId,
    done: bool,
) -> Result<()> {
    let changed = conn.execute(
        "UPDATE tasks SET done = ?1 WHERE id = ?2 AND tenant_id = ?3",
        params![done, task_id.to_string(), tenant_id.to_string()],
    )?;

    if changed == 0 {
        return Err(Error::NotFound(format!("task {}", task_id)));
    }
    Ok(())
}

pub(crate) fn list_tasks(conn: &Connection, tenant_id: TenantId) -> Result<Vec<TaskRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, tenant_id, name, project_id, done FROM tasks \
         WHERE tenant_id = ?1 ORDER BY name ASC",
    )?;

    let raws = stmt
        .query_map([tenant_id.to_string()], read_task)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    raws.into_iter().map(decode_task).collect()
}

fn decode_project(raw: (String, String, String)) -> Result<ProjectRecord> {
    let (id, tenant_id, name) = raw;
    Ok(ProjectRecord {
        id: decode_id::<ProjectId>(&id)?,
        tenant_id: decode_id::<TenantId>(&tenant_id)?,
        name,
    })
}

pub(crate) fn upsert_project(conn: &Connection, project: &ProjectRecord) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO projects (id, tenant_id, name)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(id) DO UPDATE SET name = excluded.name
        "#,
        params![
            project.id.to_string(),
            project.tenant_id.to_string(),
            project.name,
        ],
    )?;
    Ok(())
}

pub(crate) fn get_project(conn: &Connection, project_id: ProjectId) -> Result<Option<ProjectRecord>> {
    let raw = conn
        .query_row(
            "SELECT id, tenant_id, name FROM projects WHERE id = ?1",
            [project_id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;

    raw.map(decode_project).transpose()
}

pub(crate) fn list_projects(conn: &Connection, tenant_id: TenantId) -> Result<Vec<ProjectRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, tenant_id, name FROM projects WHERE tenant_id = ?1 ORDER BY name ASC",
    )?;

    let raws = stmt
        .query_map([tenant_id.to_string()], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    raws.into_iter().map(decode_project).collect()
}
