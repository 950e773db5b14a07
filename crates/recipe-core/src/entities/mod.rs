//! Entity structs for the recipes domain.
//!
//! Each entity maps to a table in the libSQL database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` so the API can return them
//! directly and publish their schema.

mod recipe;
mod user;

pub use recipe::{Ingredient, Recipe, Tag};
pub use user::User;
