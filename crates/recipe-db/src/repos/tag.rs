//! Tag repository.

use recipe_core::entities::Tag;
use recipe_core::payloads::NamedItem;

use super::named::Vocabulary;
use crate::error::DatabaseError;
use crate::service::RecipeService;

fn to_tag((id, name): (i64, String)) -> Tag {
    Tag { id, name }
}

impl RecipeService {
    pub async fn create_tag(&self, user_id: i64, item: &NamedItem) -> Result<Tag, DatabaseError> {
        item.validate()?;
        let _guard = self.write_guard().await;
        self.insert_named(Vocabulary::Tags, user_id, &item.name)
            .await
            .map(to_tag)
    }

    pub async fn get_or_create_tag(&self, user_id: i64, name: &str) -> Result<Tag, DatabaseError> {
        NamedItem::new(name).validate()?;
        let _guard = self.write_guard().await;
        self.get_or_create_named(Vocabulary::Tags, user_id, name)
            .await
            .map(to_tag)
    }

    /// The user's tags, name descending.
    pub async fn list_tags(&self, user_id: i64) -> Result<Vec<Tag>, DatabaseError> {
        let pairs = self.list_named(Vocabulary::Tags, user_id).await?;
        Ok(pairs.into_iter().map(to_tag).collect())
    }

    pub(crate) async fn tags_for_recipe(&self, recipe_id: i64) -> Result<Vec<Tag>, DatabaseError> {
        let pairs = self.named_for_recipe(Vocabulary::Tags, recipe_id).await?;
        Ok(pairs.into_iter().map(to_tag).collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recipe_core::payloads::NewUser;

    use super::*;

    async fn service_with_user() -> (RecipeService, i64) {
        let svc = RecipeService::new_local(":memory:").await.unwrap();
        let user = svc
            .create_user(&NewUser {
                email: "user@example.com".into(),
                password: "testpass123".into(),
                name: String::new(),
            })
            .await
            .unwrap();
        (svc, user.id)
    }

    #[tokio::test]
    async fn create_tag_returns_name() {
        let (svc, user_id) = service_with_user().await;
        let tag = svc.create_tag(user_id, &NamedItem::new("Tag1")).await.unwrap();
        assert_eq!(tag.to_string(), "Tag1");
    }

    #[tokio::test]
    async fn duplicate_tag_is_conflict_but_get_or_create_reuses() {
        let (svc, user_id) = service_with_user().await;
        let first = svc.create_tag(user_id, &NamedItem::new("Vegan")).await.unwrap();

        let dup = svc.create_tag(user_id, &NamedItem::new("Vegan")).await;
        assert!(matches!(dup, Err(DatabaseError::Conflict(_))));

        let reused = svc.get_or_create_tag(user_id, "Vegan").await.unwrap();
        assert_eq!(reused, first);
    }

    #[tokio::test]
    async fn list_tags_is_name_descending() {
        let (svc, user_id) = service_with_user().await;
        for name in ["Dessert", "Vegan", "Breakfast"] {
            svc.create_tag(user_id, &NamedItem::new(name)).await.unwrap();
        }
        let names: Vec<_> = svc
            .list_tags(user_id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, ["Vegan", "Dessert", "Breakfast"]);
    }

    #[tokio::test]
    async fn blank_tag_name_is_rejected() {
        let (svc, user_id) = service_with_user().await;
        let result = svc.create_tag(user_id, &NamedItem::new("")).await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }
}
