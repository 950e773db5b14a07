//! # recipe-db
//!
//! libSQL storage for the recipes API.
//!
//! Holds accounts, API tokens, recipes, and the per-user tag and ingredient
//! vocabularies. All repository methods live on [`service::RecipeService`];
//! [`RecipeDb`] only owns the connection and applies the schema.

pub mod error;
pub mod helpers;
mod migrations;
pub mod password;
pub mod repos;
pub mod service;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle.
pub struct RecipeDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl RecipeDb {
    /// Open a local database at the given path (`:memory:` for tests).
    ///
    /// Applies the schema on every open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or the
    /// schema cannot be applied.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let recipe_db = Self { db, conn };
        recipe_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(recipe_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Names of the user tables, sorted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the catalog query fails.
    pub async fn tables(&self) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
                 ORDER BY name",
                (),
            )
            .await?;
        let mut tables = Vec::new();
        while let Some(row) = rows.next().await? {
            tables.push(row.get::<String>(0)?);
        }
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    async fn test_db() -> RecipeDb {
        RecipeDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        assert_eq!(
            db.tables().await.unwrap(),
            [
                "auth_tokens",
                "ingredients",
                "recipe_ingredients",
                "recipe_tags",
                "recipes",
                "tags",
                "users",
            ]
        );
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
        assert_eq!(db.tables().await.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO recipes (user_id, title, time_minutes, price_cents) VALUES (999, 'x', 1, 100)",
                (),
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn file_database_persists_across_opens() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("recipes.db");
        let path = path.to_str().unwrap();

        let db = RecipeDb::open_local(path).await.unwrap();
        db.conn()
            .execute(
                "INSERT INTO users (email, password_hash) VALUES ('a@example.com', 'x')",
                (),
            )
            .await
            .unwrap();
        drop(db);

        let db = RecipeDb::open_local(path).await.unwrap();
        let mut rows = db.conn().query("SELECT COUNT(*) FROM users", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }
}
