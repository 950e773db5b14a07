//! Database error types for recipe-db.

use recipe_core::CoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The entity does not exist or is not owned by the requesting user.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A uniqueness rule was violated (e.g. duplicate email).
    #[error("{0}")]
    Conflict(String),

    /// Email/password did not match an active account.
    #[error("unable to authenticate with provided credentials")]
    InvalidCredentials,

    /// Payload failed domain validation.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema application failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// True when a libSQL error is a UNIQUE constraint violation.
fn is_unique_violation(error: &libsql::Error) -> bool {
    error.to_string().contains("UNIQUE constraint failed")
}

/// Map UNIQUE violations to `Conflict`, everything else to `LibSql`.
pub(crate) fn constraint_error(error: libsql::Error, conflict: impl FnOnce() -> String) -> DatabaseError {
    if is_unique_violation(&error) {
        DatabaseError::Conflict(conflict())
    } else {
        DatabaseError::LibSql(error)
    }
}
