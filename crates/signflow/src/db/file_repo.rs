//! File repository: CRUD operations for the `files` table.

use rusqlite::{params, Row};

use super::{format_timestamp, parse_timestamp, Database, DatabaseError};
use crate::model::{File, FileStatus, NodeType, SignatureFlow};

/// A raw file row from the database.
#[derive(Debug, Clone)]
pub struct FileRow {
    pub id: i64,
    pub uuid: String,
    pub node_id: i64,
    pub name: String,
    pub parent_file_id: Option<i64>,
    pub node_type: String,
    pub status: i32,
    pub signature_flow: String,
    pub created_at: String,
}

impl FileRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            uuid: row.get("uuid")?,
            node_id: row.get("node_id")?,
            name: row.get("name")?,
            parent_file_id: row.get("parent_file_id")?,
            node_type: row.get("node_type")?,
            status: row.get("status")?,
            signature_flow: row.get("signature_flow")?,
            created_at: row.get("created_at")?,
        })
    }

    fn into_file(self) -> Result<File, DatabaseError> {
        let node_type = NodeType::parse(&self.node_type).ok_or(DatabaseError::CorruptValue {
            column: "node_type",
            value: self.node_type.clone(),
            row_id: self.id,
        })?;
        let status = FileStatus::try_from(self.status).map_err(|_| DatabaseError::CorruptValue {
            column: "status",
            value: self.status.to_string(),
            row_id: self.id,
        })?;
        let signature_flow =
            SignatureFlow::parse(&self.signature_flow).ok_or(DatabaseError::CorruptValue {
                column: "signature_flow",
                value: self.signature_flow.clone(),
                row_id: self.id,
            })?;
        let created_at = parse_timestamp(&self.created_at, "created_at", self.id)?;

        Ok(File {
            id: self.id,
            uuid: self.uuid,
            node_id: self.node_id,
            name: self.name,
            parent_file_id: self.parent_file_id,
            node_type,
            status,
            signature_flow,
            created_at,
        })
    }
}

/// Inserts a file and returns its assigned id. `file.id` is ignored.
pub fn insert(db: &Database, file: &File) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO files (uuid, node_id, name, parent_file_id, node_type, status,
             signature_flow, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                file.uuid,
                file.node_id,
                file.name,
                file.parent_file_id,
                file.node_type.as_str(),
                file.status.code(),
                file.signature_flow.as_str(),
                format_timestamp(file.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Updates only the status of a file.
pub fn update_status(db: &Database, id: i64, status: FileStatus) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE files SET status = ?2 WHERE id = ?1",
            params![id, status.code()],
        )?;
        Ok(())
    })
}

fn find_one(
    db: &Database,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Option<File>, DatabaseError> {
    let row = db.with_conn(|conn| {
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query_map(params, FileRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })?;
    row.map(FileRow::into_file).transpose()
}

/// Finds a file by its id.
pub fn find_by_id(db: &Database, id: i64) -> Result<Option<File>, DatabaseError> {
    find_one(db, "SELECT * FROM files WHERE id = ?1", &[&id])
}

/// Finds a file by its uuid.
pub fn find_by_uuid(db: &Database, uuid: &str) -> Result<Option<File>, DatabaseError> {
    find_one(db, "SELECT * FROM files WHERE uuid = ?1", &[&uuid])
}

/// Lists the member files of an envelope, in insertion order.
pub fn list_children(db: &Database, envelope_id: i64) -> Result<Vec<File>, DatabaseError> {
    let rows = db.with_conn(|conn| {
        let mut stmt =
            conn.prepare("SELECT * FROM files WHERE parent_file_id = ?1 ORDER BY id ASC")?;
        let rows = stmt
            .query_map(params![envelope_id], FileRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })?;
    rows.into_iter().map(FileRow::into_file).collect()
}
