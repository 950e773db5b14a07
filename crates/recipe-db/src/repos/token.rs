//! API token repository. One token per user, created on first login.

use recipe_core::entities::User;

use super::user::{SELECT_COLS, row_to_user};
use crate::error::DatabaseError;
use crate::password::random_bytes;
use crate::service::RecipeService;

/// Token length in random bytes (40 hex characters).
const TOKEN_BYTES: usize = 20;

impl RecipeService {
    /// Return the user's token, creating one if none exists.
    pub async fn issue_token(&self, user_id: i64) -> Result<String, DatabaseError> {
        let _guard = self.write_guard().await;
        let conn = self.db().conn();

        let mut rows = conn
            .query("SELECT key FROM auth_tokens WHERE user_id = ?1", [user_id])
            .await?;
        if let Some(row) = rows.next().await? {
            return Ok(row.get::<String>(0)?);
        }

        let key = hex::encode(random_bytes(TOKEN_BYTES)?);
        conn.execute(
            "INSERT INTO auth_tokens (key, user_id) VALUES (?1, ?2)",
            libsql::params![key.as_str(), user_id],
        )
        .await?;
        tracing::debug!(user_id, "token issued");
        Ok(key)
    }

    /// Resolve a token to its active owner.
    pub async fn user_for_token(&self, key: &str) -> Result<Option<User>, DatabaseError> {
        let cols = SELECT_COLS
            .split(", ")
            .map(|c| format!("u.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {cols} FROM auth_tokens t
                     JOIN users u ON u.id = t.user_id
                     WHERE t.key = ?1 AND u.is_active = 1"
                ),
                [key],
            )
            .await?;
        rows.next().await?.map(|row| row_to_user(&row)).transpose()
    }
}
