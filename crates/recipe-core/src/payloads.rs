//! Request payloads accepted by the API and the CLI.
//!
//! Payload structs do not deny unknown fields: keys such as `user` or `id`
//! in a request body are ignored, which keeps ownership and identity out of
//! reach of clients.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::price::Price;

/// Longest accepted title, link, tag name, or ingredient name.
pub const MAX_TEXT_LEN: usize = 255;

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 5;

/// Text fields are stored trimmed; lengths are checked on the trimmed value.
fn check_len(field: &str, value: &str, allow_empty: bool) -> Result<(), CoreError> {
    let value = value.trim();
    if !allow_empty && value.is_empty() {
        return Err(CoreError::validation(field, "this field may not be blank"));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(CoreError::validation(
            field,
            format!("ensure this field has no more than {MAX_TEXT_LEN} characters"),
        ));
    }
    Ok(())
}

fn check_items(field: &str, items: Option<&[NamedItem]>) -> Result<(), CoreError> {
    for item in items.unwrap_or_default() {
        check_len(field, &item.name, false)?;
    }
    Ok(())
}

/// A tag or ingredient referenced by name inside a recipe payload.
///
/// Names are resolved per user: an existing item with the same name is
/// reused, otherwise a new one is created.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NamedItem {
    pub name: String,
}

impl NamedItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a blank or overlong name.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_len("name", &self.name, false)
    }
}

/// Body of `POST /api/recipe/recipes/` and `PUT /api/recipe/recipes/{id}/`.
///
/// `link` and `description` default to empty on create and are left
/// unchanged on a full update when omitted. `tags`/`ingredients` follow the
/// same rule: absent means "leave associations alone", `[]` clears them.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewRecipe {
    pub title: String,
    pub time_minutes: u32,
    pub price: Price,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<NamedItem>>,
    #[serde(default)]
    pub ingredients: Option<Vec<NamedItem>>,
}

impl NewRecipe {
    /// Validate field lengths.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_len("title", &self.title, false)?;
        check_len("link", self.link.as_deref().unwrap_or_default(), true)?;
        check_items("tags", self.tags.as_deref())?;
        check_items("ingredients", self.ingredients.as_deref())
    }
}

/// Body of `PATCH /api/recipe/recipes/{id}/`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RecipePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub time_minutes: Option<u32>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<NamedItem>>,
    #[serde(default)]
    pub ingredients: Option<Vec<NamedItem>>,
}

impl RecipePatch {
    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(title) = &self.title {
            check_len("title", title, false)?;
        }
        if let Some(link) = &self.link {
            check_len("link", link, true)?;
        }
        check_items("tags", self.tags.as_deref())?;
        check_items("ingredients", self.ingredients.as_deref())
    }

    /// True when the patch changes no column and no association.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.time_minutes.is_none()
            && self.price.is_none()
            && self.link.is_none()
            && self.description.is_none()
            && self.tags.is_none()
            && self.ingredients.is_none()
    }
}

impl From<NewRecipe> for RecipePatch {
    fn from(full: NewRecipe) -> Self {
        Self {
            title: Some(full.title),
            time_minutes: Some(full.time_minutes),
            price: Some(full.price),
            link: full.link,
            description: full.description,
            tags: full.tags,
            ingredients: full.ingredients,
        }
    }
}

/// Body of `POST /api/user/create/`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
}

impl NewUser {
    /// Validate password length and name length.
    ///
    /// Email shape is checked by [`crate::normalize_email`] at creation time.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` naming the offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_password(&self.password)?;
        check_len("name", &self.name, true)
    }
}

/// Body of `PATCH /api/user/me/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl UserPatch {
    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` naming the offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(password) = &self.password {
            check_password(password)?;
        }
        if let Some(name) = &self.name {
            check_len("name", name, true)?;
        }
        Ok(())
    }
}

fn check_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::validation(
            "password",
            format!("ensure this field has at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

/// Body of `POST /api/user/token/`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Response of `POST /api/user/token/`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn new_recipe_ignores_user_key() {
        let payload: NewRecipe = serde_json::from_value(json!({
            "title": "Chocolate cheesecake",
            "time_minutes": 30,
            "price": "5.99",
            "user": 42
        }))
        .unwrap();
        assert_eq!(payload.title, "Chocolate cheesecake");
        assert_eq!(payload.price.to_string(), "5.99");
        assert!(payload.tags.is_none());
        assert!(payload.link.is_none());
    }

    #[test]
    fn new_recipe_requires_price() {
        let parsed = serde_json::from_value::<NewRecipe>(json!({
            "title": "No price",
            "time_minutes": 30
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn blank_title_fails_validation() {
        let payload = NewRecipe {
            title: "  ".into(),
            time_minutes: 1,
            price: Price::default(),
            link: None,
            description: None,
            tags: None,
            ingredients: None,
        };
        let err = payload.validate().unwrap_err();
        assert!(err.to_string().starts_with("title:"));
    }

    #[test]
    fn blank_tag_name_fails_validation() {
        let patch = RecipePatch {
            tags: Some(vec![NamedItem::new("")]),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn empty_tag_list_is_distinct_from_absent() {
        let cleared: RecipePatch = serde_json::from_value(json!({"tags": []})).unwrap();
        let untouched: RecipePatch = serde_json::from_value(json!({"title": "x"})).unwrap();
        assert_eq!(cleared.tags, Some(Vec::new()));
        assert_eq!(untouched.tags, None);
        assert!(!cleared.is_empty());
        assert!(RecipePatch::default().is_empty());
    }

    #[test]
    fn full_update_converts_to_patch() {
        let full = NewRecipe {
            title: "Spaghetti carbonara".into(),
            time_minutes: 25,
            price: "12.00".parse().unwrap(),
            link: Some("http://example.com/new-recipe".into()),
            description: None,
            tags: None,
            ingredients: None,
        };
        let patch = RecipePatch::from(full);
        assert_eq!(patch.title.as_deref(), Some("Spaghetti carbonara"));
        assert_eq!(patch.time_minutes, Some(25));
        assert!(patch.description.is_none());
    }

    #[test]
    fn short_password_is_rejected() {
        let user = NewUser {
            email: "user@example.com".into(),
            password: "pw".into(),
            name: String::new(),
        };
        assert!(user.validate().is_err());
        assert!(
            UserPatch {
                password: Some("1234".into()),
                ..Default::default()
            }
            .validate()
            .is_err()
        );
    }
}
