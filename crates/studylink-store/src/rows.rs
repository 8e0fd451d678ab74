//! Row mapping and single-statement operations
//!
//! Everything here takes a plain `&Connection` so the same SQL serves both
//! autocommit reads on [`SqliteStore`](crate::SqliteStore) and reads/writes
//! inside a [`Tx`](crate::Tx).

use crate::StoreError;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use studylink_domain::{
    ActorId, CanonicalPair, LinkId, RequestId, RequestStatus, StudyLink, StudyRequest,
};

pub(crate) const REQUEST_COLUMNS: &str =
    "seq, id, sender_id, receiver_id, status, created_at, updated_at";

const LINK_COLUMNS: &str = "seq, id, member_a, member_b, created_at";

fn conversion_error(idx: usize, ty: Type, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, message.into())
}

fn actor_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<ActorId> {
    let raw: String = row.get(idx)?;
    ActorId::new(raw).map_err(|e| conversion_error(idx, Type::Text, e))
}

/// Map a row selected with [`REQUEST_COLUMNS`] to `(seq, request)`
pub(crate) fn request_from_row(row: &Row<'_>) -> rusqlite::Result<(i64, StudyRequest)> {
    let seq: i64 = row.get(0)?;
    let id_bytes: Vec<u8> = row.get(1)?;
    let id = RequestId::from_bytes(&id_bytes).map_err(|e| conversion_error(1, Type::Blob, e))?;
    let status_str: String = row.get(4)?;
    let status = RequestStatus::parse(&status_str)
        .ok_or_else(|| conversion_error(4, Type::Text, format!("Unknown status: {}", status_str)))?;

    Ok((
        seq,
        StudyRequest {
            id,
            sender: actor_at(row, 2)?,
            receiver: actor_at(row, 3)?,
            status,
            created_at: row.get::<_, i64>(5)? as u64,
            updated_at: row.get::<_, i64>(6)? as u64,
        },
    ))
}

fn link_from_row(row: &Row<'_>) -> rusqlite::Result<StudyLink> {
    let id_bytes: Vec<u8> = row.get(1)?;
    let id = LinkId::from_bytes(&id_bytes).map_err(|e| conversion_error(1, Type::Blob, e))?;

    Ok(StudyLink {
        id,
        member_a: actor_at(row, 2)?,
        member_b: actor_at(row, 3)?,
        created_at: row.get::<_, i64>(4)? as u64,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

pub(crate) fn register_actor(
    conn: &Connection,
    actor: &ActorId,
    now: u64,
) -> Result<bool, StoreError> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO actors (id, registered_at) VALUES (?1, ?2)",
        params![actor.as_str(), now as i64],
    )?;
    Ok(inserted == 1)
}

pub(crate) fn actor_exists(conn: &Connection, actor: &ActorId) -> Result<bool, StoreError> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM actors WHERE id = ?1",
            params![actor.as_str()],
            |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    Ok(exists)
}

pub(crate) fn get_request(
    conn: &Connection,
    id: RequestId,
) -> Result<Option<StudyRequest>, StoreError> {
    let sql = format!("SELECT {} FROM study_requests WHERE id = ?1", REQUEST_COLUMNS);
    let request = conn
        .query_row(&sql, params![&id.to_bytes()[..]], request_from_row)
        .optional()?;
    Ok(request.map(|(_, request)| request))
}

pub(crate) fn pending_for_pair(
    conn: &Connection,
    pair: &CanonicalPair,
) -> Result<Vec<StudyRequest>, StoreError> {
    let sql = format!(
        "SELECT {} FROM study_requests
         WHERE pair_low = ?1 AND pair_high = ?2 AND status = 'pending'
         ORDER BY seq DESC",
        REQUEST_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let requests = stmt
        .query_map(params![pair.low().as_str(), pair.high().as_str()], |row| {
            request_from_row(row).map(|(_, request)| request)
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(requests)
}

pub(crate) fn insert_request(conn: &Connection, request: &StudyRequest) -> Result<(), StoreError> {
    let pair = request.pair();
    conn.execute(
        "INSERT INTO study_requests
             (id, sender_id, receiver_id, pair_low, pair_high, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            &request.id.to_bytes()[..],
            request.sender.as_str(),
            request.receiver.as_str(),
            pair.low().as_str(),
            pair.high().as_str(),
            request.status.as_str(),
            request.created_at as i64,
            request.updated_at as i64,
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            StoreError::PendingConflict
        } else {
            StoreError::Database(e)
        }
    })?;
    Ok(())
}

pub(crate) fn update_status(
    conn: &Connection,
    id: RequestId,
    from: RequestStatus,
    to: RequestStatus,
    now: u64,
) -> Result<bool, StoreError> {
    let updated = conn.execute(
        "UPDATE study_requests SET status = ?1, updated_at = ?2
         WHERE id = ?3 AND status = ?4",
        params![to.as_str(), now as i64, &id.to_bytes()[..], from.as_str()],
    )?;
    Ok(updated == 1)
}

pub(crate) fn link_for_pair(
    conn: &Connection,
    pair: &CanonicalPair,
) -> Result<Option<StudyLink>, StoreError> {
    let sql = format!(
        "SELECT {} FROM study_links WHERE member_a = ?1 AND member_b = ?2",
        LINK_COLUMNS
    );
    let link = conn
        .query_row(
            &sql,
            params![pair.low().as_str(), pair.high().as_str()],
            link_from_row,
        )
        .optional()?;
    Ok(link)
}

pub(crate) fn insert_link(conn: &Connection, link: &StudyLink) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO study_links (id, member_a, member_b, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            &link.id.to_bytes()[..],
            link.member_a.as_str(),
            link.member_b.as_str(),
            link.created_at as i64,
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            StoreError::LinkConflict
        } else {
            StoreError::Database(e)
        }
    })?;
    Ok(())
}

pub(crate) fn delete_link(conn: &Connection, id: LinkId) -> Result<bool, StoreError> {
    let deleted = conn.execute(
        "DELETE FROM study_links WHERE id = ?1",
        params![&id.to_bytes()[..]],
    )?;
    Ok(deleted == 1)
}

pub(crate) fn partners_of(conn: &Connection, actor: &ActorId) -> Result<Vec<ActorId>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT CASE WHEN member_a = ?1 THEN member_b ELSE member_a END
         FROM study_links
         WHERE member_a = ?1 OR member_b = ?1
         ORDER BY seq DESC",
    )?;
    let partners = stmt
        .query_map(params![actor.as_str()], |row| actor_at(row, 0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(partners)
}

pub(crate) fn count_links(conn: &Connection) -> Result<u64, StoreError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM study_links", [], |row| row.get(0))?;
    Ok(count as u64)
}
