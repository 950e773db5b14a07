//! Row-to-entity parsing helpers.
//!
//! `libsql::Row` is column-indexed; these helpers isolate the conversions
//! every repo needs, including the dual datetime format (`SQLite`'s
//! `datetime('now')` vs Rust's `to_rfc3339()`).

use chrono::{DateTime, Utc};

use crate::error::{DatabaseError, constraint_error};

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Read an INTEGER 0/1 column as `bool`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_flag(row: &libsql::Row, idx: i32) -> Result<bool, DatabaseError> {
    Ok(row.get::<i64>(idx)? != 0)
}

/// Read an INTEGER column that must fit in `u32`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` for negative or oversized values.
pub fn get_u32(row: &libsql::Row, idx: i32) -> Result<u32, DatabaseError> {
    let raw = row.get::<i64>(idx)?;
    u32::try_from(raw)
        .map_err(|_| DatabaseError::Query(format!("column {idx} out of range: {raw}")))
}

/// Run an `INSERT ... RETURNING` statement and map its row.
///
/// UNIQUE violations become `DatabaseError::Conflict(conflict())`, whether the
/// driver reports them when the statement is prepared or on its first step.
/// The row is mapped while its statement is still live.
///
/// # Errors
///
/// `Conflict` for UNIQUE violations, `NoResult` if nothing was returned,
/// otherwise the driver or mapping error.
pub async fn insert_returning<T>(
    conn: &libsql::Connection,
    sql: &str,
    params: impl libsql::params::IntoParams,
    conflict: impl FnOnce() -> String,
    map: impl FnOnce(&libsql::Row) -> Result<T, DatabaseError>,
) -> Result<T, DatabaseError> {
    let mut rows = match conn.query(sql, params).await {
        Ok(rows) => rows,
        Err(e) => return Err(constraint_error(e, conflict)),
    };
    match rows.next().await {
        Ok(Some(row)) => map(&row),
        Ok(None) => Err(DatabaseError::NoResult),
        Err(e) => Err(constraint_error(e, conflict)),
    }
}
