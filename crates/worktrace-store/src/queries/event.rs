use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use worktrace_types::{ActorId, EventId, EventPayload, SessionEvent, SessionId, TenantId};

use super::session::decode_id;
use crate::util::{decode_opt_ts, decode_ts, encode_opt_ts, encode_ts};
use crate::{Error, Result};

/// Raw image of a session_events row. The payload JSON is authoritative;
/// the kind/task/project columns exist only for indexed lookups and are
/// not read back.
struct RawEvent {
    id: String,
    session_id: String,
    tenant_id: String,
    actor_id: String,
    timestamp: String,
    client_timestamp: Option<String>,
    payload: String,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEvent> {
    Ok(RawEvent {
        id: row.get(0)?,
        session_id: row.get(1)?,
        tenant_id: row.get(2)?,
        actor_id: row.get(3)?,
        timestamp: row.get(4)?,
        client_timestamp: row.get(5)?,
        payload: row.get(6)?,
    })
}

fn decode(raw: RawEvent) -> Result<SessionEvent> {
    let payload: EventPayload = serde_json::from_str(&raw.payload)
        .map_err(|err| Error::Corrupt(format!("bad event payload: {}", err)))?;

    Ok(SessionEvent {
        id: decode_id::<EventId>(&raw.id)?,
        session_id: decode_id::<SessionId>(&raw.session_id)?,
        tenant_id: decode_id::<TenantId>(&raw.tenant_id)?,
        actor_id: decode_id::<ActorId>(&raw.actor_id)?,
        timestamp: decode_ts(&raw.timestamp)?,
        client_timestamp: decode_opt_ts(raw.client_timestamp)?,
        payload,
    })
}

pub(crate) fn insert(conn: &Connection, event: &SessionEvent) -> Result<()> {
    let payload = serde_json::to_string(&event.payload)
        .map_err(|err| Error::Corrupt(format!("could not encode event payload: {}", err)))?;

    conn.execute(
        r#"
        INSERT INTO session_events (id, session_id, tenant_id, actor_id, timestamp,
                                    client_timestamp, kind, task_id, project_id, payload)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
        params![
            event.id.to_string(),
            event.session_id.to_string(),
            event.tenant_id.to_string(),
            event.actor_id.to_string(),
            encode_ts(event.timestamp),
            encode_opt_ts(event.client_timestamp),
            event.payload.kind().as_str(),
            event.payload.task_id().map(|id| id.to_string()),
            event.payload.project_id().map(|id| id.to_string()),
            payload,
        ],
    )?;

    Ok(())
}

/// Timestamp of the session's most recent event, None for an empty log.
pub(crate) fn last_timestamp(
    conn: &Connection,
    session_id: SessionId,
) -> Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT timestamp FROM session_events WHERE session_id = ?1 \
             ORDER BY timestamp DESC, rowid DESC LIMIT 1",
            [session_id.to_string()],
            |row| row.get(0),
        )
        .optional()?;

    raw.map(|s| decode_ts(&s)).transpose()
}

/// Full event log for a session in append order. The rowid tie-break only
/// matters for logs written before the ordering discipline existed.
pub(crate) fn list_for_session(
    conn: &Connection,
    session_id: SessionId,
) -> Result<Vec<SessionEvent>> {
    let mut stmt = conn.prepare(
        "SELECT id, session_id, tenant_id, actor_id, timestamp, client_timestamp, payload \
         FROM session_events WHERE session_id = ?1 ORDER BY timestamp ASC, rowid ASC",
    )?;

    let raws = stmt
        .query_map([session_id.to_string()], read_row)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    raws.into_iter().map(decode).collect()
}
