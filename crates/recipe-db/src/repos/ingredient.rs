//! Ingredient repository.

use recipe_core::entities::Ingredient;
use recipe_core::payloads::NamedItem;

use super::named::Vocabulary;
use crate::error::DatabaseError;
use crate::service::RecipeService;

fn to_ingredient((id, name): (i64, String)) -> Ingredient {
    Ingredient { id, name }
}

impl RecipeService {
    pub async fn create_ingredient(
        &self,
        user_id: i64,
        item: &NamedItem,
    ) -> Result<Ingredient, DatabaseError> {
        item.validate()?;
        let _guard = self.write_guard().await;
        self.insert_named(Vocabulary::Ingredients, user_id, &item.name)
            .await
            .map(to_ingredient)
    }

    pub async fn get_or_create_ingredient(
        &self,
        user_id: i64,
        name: &str,
    ) -> Result<Ingredient, DatabaseError> {
        NamedItem::new(name).validate()?;
        let _guard = self.write_guard().await;
        self.get_or_create_named(Vocabulary::Ingredients, user_id, name)
            .await
            .map(to_ingredient)
    }

    /// The user's ingredients, name descending.
    pub async fn list_ingredients(&self, user_id: i64) -> Result<Vec<Ingredient>, DatabaseError> {
        let pairs = self.list_named(Vocabulary::Ingredients, user_id).await?;
        Ok(pairs.into_iter().map(to_ingredient).collect())
    }

    pub(crate) async fn ingredients_for_recipe(
        &self,
        recipe_id: i64,
    ) -> Result<Vec<Ingredient>, DatabaseError> {
        let pairs = self
            .named_for_recipe(Vocabulary::Ingredients, recipe_id)
            .await?;
        Ok(pairs.into_iter().map(to_ingredient).collect())
    }
}
