//! Recipe repository: owner-scoped CRUD with nested tags and ingredients.
//!
//! Every read and write is filtered by `user_id`; a recipe owned by someone
//! else is indistinguishable from one that does not exist.

use recipe_core::Price;
use recipe_core::entities::Recipe;
use recipe_core::payloads::{NewRecipe, RecipePatch};

use super::named::Vocabulary;
use crate::error::DatabaseError;
use crate::helpers::get_u32;
use crate::service::RecipeService;

const SELECT_COLS: &str = "id, title, time_minutes, price_cents, link, description";

/// Columns only; associations are filled in by `load_associations`.
fn row_to_recipe(row: &libsql::Row) -> Result<Recipe, DatabaseError> {
    Ok(Recipe {
        id: row.get(0)?,
        title: row.get(1)?,
        time_minutes: get_u32(row, 2)?,
        price: Price::from_cents(get_u32(row, 3)?)?,
        link: row.get(4)?,
        description: row.get(5)?,
        tags: Vec::new(),
        ingredients: Vec::new(),
    })
}

const fn not_found(id: i64) -> DatabaseError {
    DatabaseError::NotFound {
        entity: "recipe",
        id,
    }
}

impl RecipeService {
    /// Create a recipe owned by `user_id`.
    ///
    /// Nested tags and ingredients are matched by name against the owner's
    /// existing items and created when missing.
    pub async fn create_recipe(&self, user_id: i64, new: &NewRecipe) -> Result<Recipe, DatabaseError> {
        new.validate()?;
        let id = {
            let _guard = self.write_guard().await;
            self.begin().await?;
            let result = self.insert_recipe(user_id, new).await;
            self.finish(result).await?
        };
        tracing::debug!(user_id, recipe_id = id, "recipe created");
        self.get_recipe(user_id, id).await
    }

    async fn insert_recipe(&self, user_id: i64, new: &NewRecipe) -> Result<i64, DatabaseError> {
        let id: i64 = {
            let mut rows = self
                .db()
                .conn()
                .query(
                    "INSERT INTO recipes (user_id, title, time_minutes, price_cents, link, description)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                     RETURNING id",
                    libsql::params![
                        user_id,
                        new.title.trim(),
                        i64::from(new.time_minutes),
                        i64::from(new.price.cents()),
                        new.link.as_deref().unwrap_or_default().trim(),
                        new.description.as_deref().unwrap_or_default().trim()
                    ],
                )
                .await?;
            rows.next().await?.ok_or(DatabaseError::NoResult)?.get(0)?
        };

        if let Some(tags) = &new.tags {
            self.relink_named(Vocabulary::Tags, user_id, id, tags).await?;
        }
        if let Some(ingredients) = &new.ingredients {
            self.relink_named(Vocabulary::Ingredients, user_id, id, ingredients)
                .await?;
        }
        Ok(id)
    }

    /// The owner's recipes, newest first.
    pub async fn list_recipes(&self, user_id: i64) -> Result<Vec<Recipe>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM recipes WHERE user_id = ?1 ORDER BY id DESC"),
                [user_id],
            )
            .await?;
        let mut recipes = Vec::new();
        while let Some(row) = rows.next().await? {
            recipes.push(row_to_recipe(&row)?);
        }
        for recipe in &mut recipes {
            self.load_associations(recipe).await?;
        }
        Ok(recipes)
    }

    pub async fn get_recipe(&self, user_id: i64, id: i64) -> Result<Recipe, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM recipes WHERE id = ?1 AND user_id = ?2"),
                [id, user_id],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| not_found(id))?;
        let mut recipe = row_to_recipe(&row)?;
        self.load_associations(&mut recipe).await?;
        Ok(recipe)
    }

    async fn load_associations(&self, recipe: &mut Recipe) -> Result<(), DatabaseError> {
        recipe.tags = self.tags_for_recipe(recipe.id).await?;
        recipe.ingredients = self.ingredients_for_recipe(recipe.id).await?;
        Ok(())
    }

    /// Full update (`PUT`). Omitted `link`/`description`/`tags`/`ingredients`
    /// keep their current values.
    pub async fn replace_recipe(
        &self,
        user_id: i64,
        id: i64,
        full: NewRecipe,
    ) -> Result<Recipe, DatabaseError> {
        full.validate()?;
        self.patch_recipe(user_id, id, &RecipePatch::from(full)).await
    }

    /// Partial update (`PATCH`). A present `tags`/`ingredients` list replaces
    /// the current links; `[]` clears them.
    pub async fn patch_recipe(
        &self,
        user_id: i64,
        id: i64,
        patch: &RecipePatch,
    ) -> Result<Recipe, DatabaseError> {
        patch.validate()?;
        {
            let _guard = self.write_guard().await;
            self.begin().await?;
            let result = self.apply_patch(user_id, id, patch).await;
            self.finish(result).await?;
        }
        self.get_recipe(user_id, id).await
    }

    async fn apply_patch(&self, user_id: i64, id: i64, patch: &RecipePatch) -> Result<(), DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref title) = patch.title {
            sets.push(format!("title = ?{idx}"));
            params.push(title.trim().to_owned().into());
            idx += 1;
        }
        if let Some(minutes) = patch.time_minutes {
            sets.push(format!("time_minutes = ?{idx}"));
            params.push(i64::from(minutes).into());
            idx += 1;
        }
        if let Some(price) = patch.price {
            sets.push(format!("price_cents = ?{idx}"));
            params.push(i64::from(price.cents()).into());
            idx += 1;
        }
        if let Some(ref link) = patch.link {
            sets.push(format!("link = ?{idx}"));
            params.push(link.trim().to_owned().into());
            idx += 1;
        }
        if let Some(ref description) = patch.description {
            sets.push(format!("description = ?{idx}"));
            params.push(description.trim().to_owned().into());
            idx += 1;
        }

        // updated_at is always set; zero changed rows means missing or not owned.
        sets.push("updated_at = datetime('now')".to_string());
        params.push(id.into());
        params.push(user_id.into());
        let sql = format!(
            "UPDATE recipes SET {} WHERE id = ?{idx} AND user_id = ?{}",
            sets.join(", "),
            idx + 1
        );

        let changed = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if changed == 0 {
            return Err(not_found(id));
        }

        if let Some(tags) = &patch.tags {
            self.relink_named(Vocabulary::Tags, user_id, id, tags).await?;
        }
        if let Some(ingredients) = &patch.ingredients {
            self.relink_named(Vocabulary::Ingredients, user_id, id, ingredients)
                .await?;
        }
        Ok(())
    }

    pub async fn delete_recipe(&self, user_id: i64, id: i64) -> Result<(), DatabaseError> {
        let _guard = self.write_guard().await;
        let deleted = self
            .db()
            .conn()
            .execute(
                "DELETE FROM recipes WHERE id = ?1 AND user_id = ?2",
                [id, user_id],
            )
            .await?;
        if deleted == 0 {
            return Err(not_found(id));
        }
        tracing::debug!(user_id, recipe_id = id, "recipe deleted");
        Ok(())
    }
}
