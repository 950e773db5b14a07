//! Service layer owning the database handle.
//!
//! `RecipeService` wraps `RecipeDb`. All repo methods are implemented as
//! `impl RecipeService` blocks under `repos/`.
//!
//! Multi-statement mutations (a recipe row plus its associations) hold the
//! write lock for their whole duration so concurrent requests sharing the
//! connection cannot interleave inside them.

use tokio::sync::{Mutex, MutexGuard};

use crate::RecipeDb;
use crate::error::DatabaseError;

pub struct RecipeService {
    db: RecipeDb,
    write_lock: Mutex<()>,
}

impl RecipeService {
    /// Create a new service wrapping a local database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = RecipeDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `RecipeDb`.
    #[must_use]
    pub fn from_db(db: RecipeDb) -> Self {
        Self {
            db,
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn db(&self) -> &RecipeDb {
        &self.db
    }

    pub(crate) async fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Open an explicit transaction. Callers hold [`Self::write_guard`].
    pub(crate) async fn begin(&self) -> Result<(), DatabaseError> {
        self.db.conn().execute("BEGIN", ()).await?;
        Ok(())
    }

    /// Commit on success, roll back on error, and pass the result through.
    pub(crate) async fn finish<T>(
        &self,
        result: Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        let conn = self.db.conn();
        match result {
            Ok(value) => {
                conn.execute("COMMIT", ()).await?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback) = conn.execute("ROLLBACK", ()).await {
                    tracing::warn!(%rollback, "rollback failed");
                }
                Err(error)
            }
        }
    }
}
