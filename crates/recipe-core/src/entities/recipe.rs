use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::price::Price;

/// A label a user attaches to recipes (e.g. "Dessert").
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An ingredient in a user's pantry, shared across that user's recipes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A recipe with its tags and ingredients resolved.
///
/// The owning user is deliberately absent: ownership is implied by the
/// authenticated request and can never be changed through a payload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub time_minutes: u32,
    pub price: Price,
    pub link: String,
    pub description: String,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}
