//! Job repository: the queue rows background workers consume.
//!
//! Only enqueueing and counting live here; claiming and running jobs is the
//! worker process's business.

use chrono::{DateTime, Utc};
use rusqlite::params;

use super::{format_timestamp, Database, DatabaseError};
use crate::store::JobClassCount;

/// Enqueues a job of `class` with a JSON argument. Returns the job id.
pub fn enqueue(
    db: &Database,
    class: &str,
    argument: &serde_json::Value,
    created_at: DateTime<Utc>,
) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO jobs (class, argument, created_at) VALUES (?1, ?2, ?3)",
            params![class, argument.to_string(), format_timestamp(created_at)],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Counts queued jobs grouped by class.
pub fn count_by_class(db: &Database) -> Result<Vec<JobClassCount>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt =
            conn.prepare("SELECT class, COUNT(*) FROM jobs GROUP BY class ORDER BY class")?;
        let counts = stmt
            .query_map([], |row| {
                Ok(JobClassCount {
                    class: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    })
}
