//! Shared storage for the per-user name vocabularies (tags, ingredients).
//!
//! Both tables have the same shape (`id`, `user_id`, `name`, unique on
//! `(user_id, name)`) and the same join-table layout, so the SQL lives here
//! once and `tag.rs`/`ingredient.rs` map rows into their entity types.

use recipe_core::payloads::NamedItem;

use crate::error::DatabaseError;
use crate::helpers::insert_returning;
use crate::service::RecipeService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Vocabulary {
    Tags,
    Ingredients,
}

impl Vocabulary {
    const fn table(self) -> &'static str {
        match self {
            Self::Tags => "tags",
            Self::Ingredients => "ingredients",
        }
    }

    const fn link_table(self) -> &'static str {
        match self {
            Self::Tags => "recipe_tags",
            Self::Ingredients => "recipe_ingredients",
        }
    }

    const fn link_column(self) -> &'static str {
        match self {
            Self::Tags => "tag_id",
            Self::Ingredients => "ingredient_id",
        }
    }

    pub(crate) const fn entity(self) -> &'static str {
        match self {
            Self::Tags => "tag",
            Self::Ingredients => "ingredient",
        }
    }
}

fn row_to_pair(row: &libsql::Row) -> Result<(i64, String), DatabaseError> {
    Ok((row.get(0)?, row.get(1)?))
}

async fn collect_pairs(mut rows: libsql::Rows) -> Result<Vec<(i64, String)>, DatabaseError> {
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        out.push(row_to_pair(&row)?);
    }
    Ok(out)
}

impl RecipeService {
    /// Insert a new name; duplicates for the same user are a conflict.
    pub(crate) async fn insert_named(
        &self,
        kind: Vocabulary,
        user_id: i64,
        name: &str,
    ) -> Result<(i64, String), DatabaseError> {
        let name = name.trim();
        let table = kind.table();
        insert_returning(
            self.db().conn(),
            &format!("INSERT INTO {table} (user_id, name) VALUES (?1, ?2) RETURNING id, name"),
            libsql::params![user_id, name],
            || format!("{} '{name}' already exists", kind.entity()),
            row_to_pair,
        )
        .await
    }

    /// Return the user's item with this name (surrounding whitespace
    /// ignored), creating it if absent.
    pub(crate) async fn get_or_create_named(
        &self,
        kind: Vocabulary,
        user_id: i64,
        name: &str,
    ) -> Result<(i64, String), DatabaseError> {
        let name = name.trim();
        let table = kind.table();
        let conn = self.db().conn();
        conn.execute(
            &format!("INSERT INTO {table} (user_id, name) VALUES (?1, ?2) ON CONFLICT (user_id, name) DO NOTHING"),
            libsql::params![user_id, name],
        )
        .await?;
        let mut rows = conn
            .query(
                &format!("SELECT id, name FROM {table} WHERE user_id = ?1 AND name = ?2"),
                libsql::params![user_id, name],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_pair(&row)
    }

    pub(crate) async fn list_named(
        &self,
        kind: Vocabulary,
        user_id: i64,
    ) -> Result<Vec<(i64, String)>, DatabaseError> {
        let table = kind.table();
        let rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT id, name FROM {table} WHERE user_id = ?1 ORDER BY name DESC, id DESC"),
                [user_id],
            )
            .await?;
        collect_pairs(rows).await
    }

    /// Items linked to a recipe, in the order they were created.
    pub(crate) async fn named_for_recipe(
        &self,
        kind: Vocabulary,
        recipe_id: i64,
    ) -> Result<Vec<(i64, String)>, DatabaseError> {
        let (table, link, column) = (kind.table(), kind.link_table(), kind.link_column());
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT v.id, v.name FROM {table} v
                     JOIN {link} l ON l.{column} = v.id
                     WHERE l.recipe_id = ?1
                     ORDER BY v.id"
                ),
                [recipe_id],
            )
            .await?;
        collect_pairs(rows).await
    }

    /// Replace a recipe's links with `items`, get-or-creating each by name.
    ///
    /// Caller holds the write guard and an open transaction.
    pub(crate) async fn relink_named(
        &self,
        kind: Vocabulary,
        user_id: i64,
        recipe_id: i64,
        items: &[NamedItem],
    ) -> Result<(), DatabaseError> {
        let (link, column) = (kind.link_table(), kind.link_column());
        let conn = self.db().conn();
        conn.execute(
            &format!("DELETE FROM {link} WHERE recipe_id = ?1"),
            [recipe_id],
        )
        .await?;
        for item in items {
            let (item_id, _) = self.get_or_create_named(kind, user_id, &item.name).await?;
            conn.execute(
                &format!("INSERT OR IGNORE INTO {link} (recipe_id, {column}) VALUES (?1, ?2)"),
                libsql::params![recipe_id, item_id],
            )
            .await?;
        }
        Ok(())
    }
}
