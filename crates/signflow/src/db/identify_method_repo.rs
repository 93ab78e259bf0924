//! Identify method repository: operations for the `identify_methods` table.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};
use crate::model::{IdentifyMethod, IdentifyMethodKind};

fn from_row(row: &Row<'_>) -> Result<(i64, i64, String, String, bool, bool), rusqlite::Error> {
    Ok((
        row.get("id")?,
        row.get("sign_request_id")?,
        row.get("method")?,
        row.get("value")?,
        row.get("mandatory")?,
        row.get("notify")?,
    ))
}

/// Inserts or updates an identify method, keyed by `(sign_request_id, method, value)`.
///
/// Assigns `method.id` on insert.
pub fn save(db: &Database, method: &mut IdentifyMethod) -> Result<(), DatabaseError> {
    let sign_request_id = method.sign_request_id.ok_or(DatabaseError::CorruptValue {
        column: "sign_request_id",
        value: "NULL".to_string(),
        row_id: method.id.unwrap_or_default(),
    })?;

    let id = db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO identify_methods (sign_request_id, method, value, mandatory, notify)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (sign_request_id, method, value)
             DO UPDATE SET mandatory = excluded.mandatory, notify = excluded.notify",
            params![
                sign_request_id,
                method.kind.as_str(),
                method.value,
                method.mandatory,
                method.notify,
            ],
        )?;
        let id: i64 = conn.query_row(
            "SELECT id FROM identify_methods
             WHERE sign_request_id = ?1 AND method = ?2 AND value = ?3",
            params![sign_request_id, method.kind.as_str(), method.value],
            |r| r.get(0),
        )?;
        Ok(id)
    })?;

    method.id = Some(id);
    Ok(())
}

/// Lists the identify methods bound to a sign request.
pub fn list_by_sign_request(
    db: &Database,
    sign_request_id: i64,
) -> Result<Vec<IdentifyMethod>, DatabaseError> {
    let rows = db.with_conn(|conn| {
        let mut stmt = conn
            .prepare("SELECT * FROM identify_methods WHERE sign_request_id = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![sign_request_id], from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })?;

    rows.into_iter()
        .map(|(id, sign_request_id, kind, value, mandatory, notify)| {
            let kind = IdentifyMethodKind::parse(&kind).ok_or(DatabaseError::CorruptValue {
                column: "method",
                value: kind.clone(),
                row_id: id,
            })?;
            Ok(IdentifyMethod {
                id: Some(id),
                sign_request_id: Some(sign_request_id),
                kind,
                value,
                mandatory,
                notify,
            })
        })
        .collect()
}
