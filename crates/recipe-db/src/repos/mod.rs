//! Repository methods, one file per aggregate, all on `RecipeService`.

mod ingredient;
mod named;
mod recipe;
mod tag;
mod token;
mod user;
