use rusqlite::Connection;

use crate::Result;

// Schema version (increment when changing table definitions)
pub const SCHEMA_VERSION: i32 = 1;

// NOTE: Storage Design
//
// Why derived-nothing rows?
// - Durations are replayed from session_events on every read; the sessions
//   table holds lifecycle state only, so rows can never drift from the log
// - Event payloads live in one JSON column; kind/task_id/project_id are
//   denormalized into indexed columns purely for lookup
//
// Why soft delete (is_deleted flag)?
// - Discarded sessions stay retrievable on explicit request
// - UPDATE instead of a cascading multi-table DELETE transaction
//
// Why a partial unique index on open sessions?
// - "At most one running/paused session per (tenant, actor)" is checked
//   read-then-write at start time; the index turns a lost race into a
//   constraint violation instead of two open sessions

pub fn init_schema(conn: &Connection) -> Result<()> {
    let current_version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current_version != SCHEMA_VERSION {
        drop_all_tables(conn)?;
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            tenant_id TEXT NOT NULL,
            actor_id TEXT NOT NULL,
            status TEXT NOT NULL,
            started_at TEXT NOT NULL,
            ended_at TEXT,
            cancel_mode TEXT,
            cancelled_at TEXT,
            discarded_at TEXT,
            summary TEXT,
            project_ids TEXT NOT NULL DEFAULT '[]',
            excluded_from_summaries BOOLEAN NOT NULL DEFAULT 0,
            is_deleted BOOLEAN NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS session_events (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL,
            tenant_id TEXT NOT NULL,
            actor_id TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            client_timestamp TEXT,
            kind TEXT NOT NULL,
            task_id TEXT,
            project_id TEXT,
            payload TEXT NOT NULL,
            FOREIGN KEY (session_id) REFERENCES sessions(id)
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            tenant_id TEXT NOT NULL,
            name TEXT NOT NULL,
            project_id TEXT,
            done BOOLEAN NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS projects (
            id TEXT PRIMARY KEY,
            tenant_id TEXT NOT NULL,
            name TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_sessions_one_open
            ON sessions(tenant_id, actor_id)
            WHERE status IN ('running', 'paused') AND is_deleted = 0;

        CREATE INDEX IF NOT EXISTS idx_sessions_actor
            ON sessions(tenant_id, actor_id, started_at DESC);
        CREATE INDEX IF NOT EXISTS idx_events_session
            ON session_events(session_id, timestamp);
        CREATE INDEX IF NOT EXISTS idx_events_task ON session_events(task_id);
        CREATE INDEX IF NOT EXISTS idx_tasks_tenant ON tasks(tenant_id);
        CREATE INDEX IF NOT EXISTS idx_projects_tenant ON projects(tenant_id);
        "#,
    )?;

    conn.execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])?;

    Ok(())
}

fn drop_all_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS session_events;
        DROP TABLE IF EXISTS sessions;
        DROP TABLE IF EXISTS tasks;
        DROP TABLE IF EXISTS projects;
        "#,
    )?;
    Ok(())
}
