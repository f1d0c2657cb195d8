use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;

use worktrace_types::{ActorId, CancelMode, ProjectId, Session, SessionId, SessionStatus, TenantId};

use crate::util::{decode_opt_ts, decode_ts, encode_opt_ts, encode_ts};
use crate::{Error, Result};

const COLUMNS: &str = "id, tenant_id, actor_id, status, started_at, ended_at, cancel_mode, \
     cancelled_at, discarded_at, summary, project_ids, excluded_from_summaries, is_deleted";

/// Raw TEXT/BOOL image of a sessions row, decoded into domain types in a
/// second step so parse failures surface as `Corrupt` instead of a
/// generic database error.
struct RawSession {
    id: String,
    tenant_id: String,
    actor_id: String,
    status: String,
    started_at: String,
    ended_at: Option<String>,
    cancel_mode: Option<String>,
    cancelled_at: Option<String>,
    discarded_at: Option<String>,
    summary: Option<String>,
    project_ids: String,
    excluded_from_summaries: bool,
    is_deleted: bool,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSession> {
    Ok(RawSession {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        actor_id: row.get(2)?,
        status: row.get(3)?,
        started_at: row.get(4)?,
        ended_at: row.get(5)?,
        cancel_mode: row.get(6)?,
        cancelled_at: row.get(7)?,
        discarded_at: row.get(8)?,
        summary: row.get(9)?,
        project_ids: row.get(10)?,
        excluded_from_summaries: row.get(11)?,
        is_deleted: row.get(12)?,
    })
}

pub(crate) fn decode_id<T>(raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|err| Error::Corrupt(format!("bad identifier '{}': {}", raw, err)))
}

fn decode(raw: RawSession) -> Result<Session> {
    let status = SessionStatus::parse(&raw.status)
        .ok_or_else(|| Error::Corrupt(format!("unknown session status '{}'", raw.status)))?;
    let cancel_mode = raw
        .cancel_mode
        .map(|s| {
            CancelMode::parse(&s)
                .ok_or_else(|| Error::Corrupt(format!("unknown cancel mode '{}'", s)))
        })
        .transpose()?;
    let project_ids: BTreeSet<ProjectId> = serde_json::from_str(&raw.project_ids)
        .map_err(|err| Error::Corrupt(format!("bad project id list: {}", err)))?;

    Ok(Session {
        id: decode_id::<SessionId>(&raw.id)?,
        tenant_id: decode_id::<TenantId>(&raw.tenant_id)?,
        actor_id: decode_id::<ActorId>(&raw.actor_id)?,
        status,
        started_at: decode_ts(&raw.started_at)?,
        ended_at: decode_opt_ts(raw.ended_at)?,
        cancel_mode,
        cancelled_at: decode_opt_ts(raw.cancelled_at)?,
        discarded_at: decode_opt_ts(raw.discarded_at)?,
        summary: raw.summary,
        project_ids,
        excluded_from_summaries: raw.excluded_from_summaries,
        is_deleted: raw.is_deleted,
    })
}

fn encode_project_ids(ids: &BTreeSet<ProjectId>) -> Result<String> {
    serde_json::to_string(ids)
        .map_err(|err| Error::Corrupt(format!("could not encode project ids: {}", err)))
}

pub(crate) fn insert(conn: &Connection, session: &Session) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO sessions (id, tenant_id, actor_id, status, started_at, ended_at, cancel_mode,
                              cancelled_at, discarded_at, summary, project_ids,
                              excluded_from_summaries, is_deleted)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
        params![
            session.id.to_string(),
            session.tenant_id.to_string(),
            session.actor_id.to_string(),
            session.status.as_str(),
            encode_ts(session.started_at),
            encode_opt_ts(session.ended_at),
            session.cancel_mode.map(|m| m.as_str()),
            encode_opt_ts(session.cancelled_at),
            encode_opt_ts(session.discarded_at),
            &session.summary,
            encode_project_ids(&session.project_ids)?,
            session.excluded_from_summaries,
            session.is_deleted,
        ],
    )?;

    Ok(())
}

pub(crate) fn update(conn: &Connection, session: &Session) -> Result<()> {
    let changed = conn.execute(
        r#"
        UPDATE sessions
        SET status = ?1, ended_at = ?2, cancel_mode = ?3, cancelled_at = ?4, discarded_at = ?5,
            summary = ?6, project_ids = ?7, excluded_from_summaries = ?8, is_deleted = ?9
        WHERE id = ?10 AND tenant_id = ?11
        "#,
        params![
            session.status.as_str(),
            encode_opt_ts(session.ended_at),
            session.cancel_mode.map(|m| m.as_str()),
            encode_opt_ts(session.cancelled_at),
            encode_opt_ts(session.discarded_at),
            &session.summary,
            encode_project_ids(&session.project_ids)?,
            session.excluded_from_summaries,
            session.is_deleted,
            session.id.to_string(),
            session.tenant_id.to_string(),
        ],
    )?;

    if changed == 0 {
        return Err(Error::NotFound(format!("session {}", session.id)));
    }
    Ok(())
}

pub(crate) fn get(
    conn: &Connection,
    tenant_id: TenantId,
    session_id: SessionId,
    include_discarded: bool,
) -> Result<Option<Session>> {
    let discarded_clause = if include_discarded {
        ""
    } else {
        " AND is_deleted = 0"
    };
    let sql = format!(
        "SELECT {COLUMNS} FROM sessions WHERE id = ?1 AND tenant_id = ?2{discarded_clause}"
    );

    let raw = conn
        .query_row(
            &sql,
            params![session_id.to_string(), tenant_id.to_string()],
            read_row,
        )
        .optional()?;
    raw.map(decode).transpose()
}

pub(crate) fn find_active(
    conn: &Connection,
    tenant_id: TenantId,
    actor_id: ActorId,
) -> Result<Option<Session>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM sessions \
         WHERE tenant_id = ?1 AND actor_id = ?2 \
           AND status IN ('running', 'paused') AND is_deleted = 0"
    );

    let raw = conn
        .query_row(
            &sql,
            params![tenant_id.to_string(), actor_id.to_string()],
            read_row,
        )
        .optional()?;
    raw.map(decode).transpose()
}

pub(crate) fn list(
    conn: &Connection,
    tenant_id: TenantId,
    actor_id: ActorId,
    status: Option<SessionStatus>,
    include_discarded: bool,
) -> Result<Vec<Session>> {
    let mut where_clauses = vec!["tenant_id = ?", "actor_id = ?"];
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![
        Box::new(tenant_id.to_string()),
        Box::new(actor_id.to_string()),
    ];

    if let Some(status) = status {
        where_clauses.push("status = ?");
        params.push(Box::new(status.as_str().to_string()));
    }

    if !include_discarded {
        where_clauses.push("is_deleted = 0");
    }

    let sql = format!(
        "SELECT {COLUMNS} FROM sessions WHERE {} ORDER BY started_at DESC",
        where_clauses.join(" AND ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let raws = stmt
        .query_map(param_refs.as_slice(), read_row)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    raws.into_iter().map(decode).collect()
}

/// Non-deleted sessions of this actor with at least one event referencing
/// the task, oldest first.
pub(crate) fn list_with_task(
    conn: &Connection,
    tenant_id: TenantId,
    actor_id: ActorId,
    task_id: worktrace_types::TaskId,
) -> Result<Vec<Session>> {
    let sql = format!(
        "SELECT DISTINCT s.{} FROM sessions s \
         JOIN session_events e ON e.session_id = s.id \
         WHERE s.tenant_id = ?1 AND s.actor_id = ?2 AND s.is_deleted = 0 AND e.task_id = ?3 \
         ORDER BY s.started_at ASC",
        COLUMNS.replace(", ", ", s.")
    );

    let mut stmt = conn.prepare(&sql)?;
    let raws = stmt
        .query_map(
            params![
                tenant_id.to_string(),
                actor_id.to_string(),
                task_id.to_string()
            ],
            read_row,
        )?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    raws.into_iter().map(decode).collect()
}
