pub mod meta;
pub mod recipe;
pub mod user;
