//! Sign request repository: CRUD operations for the `sign_requests` table.

use rusqlite::{params, Row};

use super::{format_timestamp, parse_timestamp, Database, DatabaseError};
use crate::model::{IdentifyMethod, SignRequest, SignRequestStatus};

/// A raw sign request row from the database.
#[derive(Debug, Clone)]
pub struct SignRequestRow {
    pub id: i64,
    pub uuid: String,
    pub file_id: i64,
    pub signing_order: u32,
    pub display_name: String,
    pub description: Option<String>,
    pub status: i32,
    pub signed: Option<String>,
    pub created_at: String,
}

impl SignRequestRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            uuid: row.get("uuid")?,
            file_id: row.get("file_id")?,
            signing_order: row.get("signing_order")?,
            display_name: row.get("display_name")?,
            description: row.get("description")?,
            status: row.get("status")?,
            signed: row.get("signed")?,
            created_at: row.get("created_at")?,
        })
    }

    fn into_sign_request(self) -> Result<SignRequest, DatabaseError> {
        let status =
            SignRequestStatus::try_from(self.status).map_err(|_| DatabaseError::CorruptValue {
                column: "status",
                value: self.status.to_string(),
                row_id: self.id,
            })?;
        let signed = self
            .signed
            .as_deref()
            .map(|s| parse_timestamp(s, "signed", self.id))
            .transpose()?;
        let created_at = parse_timestamp(&self.created_at, "created_at", self.id)?;

        Ok(SignRequest {
            id: Some(self.id),
            uuid: self.uuid,
            file_id: self.file_id,
            signing_order: self.signing_order,
            display_name: self.display_name,
            description: self.description,
            status,
            signed,
            created_at,
        })
    }
}

fn collect(rows: Vec<SignRequestRow>) -> Result<Vec<SignRequest>, DatabaseError> {
    rows.into_iter()
        .map(SignRequestRow::into_sign_request)
        .collect()
}

/// Inserts a new sign request and returns its assigned id.
pub fn insert(db: &Database, sr: &SignRequest) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO sign_requests (uuid, file_id, signing_order, display_name, description,
             status, signed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                sr.uuid,
                sr.file_id,
                sr.signing_order,
                sr.display_name,
                sr.description,
                sr.status.code(),
                sr.signed.map(format_timestamp),
                format_timestamp(sr.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Updates an existing sign request. `uuid`, `file_id` and `created_at` are immutable.
pub fn update(db: &Database, id: i64, sr: &SignRequest) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE sign_requests SET signing_order=?2, display_name=?3, description=?4,
             status=?5, signed=?6
             WHERE id=?1",
            params![
                id,
                sr.signing_order,
                sr.display_name,
                sr.description,
                sr.status.code(),
                sr.signed.map(format_timestamp),
            ],
        )?;
        Ok(())
    })
}

fn find_one(
    db: &Database,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Option<SignRequest>, DatabaseError> {
    let row = db.with_conn(|conn| {
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query_map(params, SignRequestRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })?;
    row.map(SignRequestRow::into_sign_request).transpose()
}

/// Finds a sign request by its id.
pub fn find_by_id(db: &Database, id: i64) -> Result<Option<SignRequest>, DatabaseError> {
    find_one(db, "SELECT * FROM sign_requests WHERE id = ?1", &[&id])
}

/// Finds a sign request by its uuid.
pub fn find_by_uuid(db: &Database, uuid: &str) -> Result<Option<SignRequest>, DatabaseError> {
    find_one(db, "SELECT * FROM sign_requests WHERE uuid = ?1", &[&uuid])
}

/// Finds the sign request of a file bound to an identify method of the same kind and value.
pub fn find_by_identify_method(
    db: &Database,
    method: &IdentifyMethod,
    file_id: i64,
) -> Result<Option<SignRequest>, DatabaseError> {
    find_one(
        db,
        "SELECT sr.* FROM sign_requests sr
         JOIN identify_methods im ON im.sign_request_id = sr.id
         WHERE sr.file_id = ?1 AND im.method = ?2 AND im.value = ?3
         ORDER BY sr.id ASC LIMIT 1",
        &[&file_id, &method.kind.as_str(), &method.value],
    )
}

/// Finds the sign request of `file_id` that shares an identify method with the
/// sign request `sign_request_id`, i.e. the same signer's row on another file.
pub fn find_same_signer_on_file(
    db: &Database,
    file_id: i64,
    sign_request_id: i64,
) -> Result<Option<SignRequest>, DatabaseError> {
    find_one(
        db,
        "SELECT sr.* FROM sign_requests sr
         JOIN identify_methods im ON im.sign_request_id = sr.id
         JOIN identify_methods other ON other.method = im.method AND other.value = im.value
         WHERE sr.file_id = ?1 AND other.sign_request_id = ?2
         ORDER BY sr.id ASC LIMIT 1",
        &[&file_id, &sign_request_id],
    )
}

/// Lists all sign requests of a file ordered by signing order.
pub fn list_by_file(db: &Database, file_id: i64) -> Result<Vec<SignRequest>, DatabaseError> {
    let rows = db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM sign_requests WHERE file_id = ?1 ORDER BY signing_order ASC, id ASC",
        )?;
        let rows = stmt
            .query_map(params![file_id], SignRequestRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })?;
    collect(rows)
}

/// Counts unsigned sign requests of a file with a signing order below `order`.
pub fn count_unsigned_below_order(
    db: &Database,
    file_id: i64,
    order: u32,
) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM sign_requests
             WHERE file_id = ?1 AND signing_order < ?2 AND signed IS NULL",
            params![file_id, order],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}
