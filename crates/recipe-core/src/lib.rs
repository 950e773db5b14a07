//! # recipe-core
//!
//! Core types shared across the recipes workspace.
//!
//! - Entity structs returned by the API (users, recipes, tags, ingredients)
//! - Request payloads with their validation rules
//! - Value types with wire-format rules (`Price`, normalized email)
//! - Cross-cutting error types
//! - JSON Schemas for the OpenAPI document served at `/api/schema/`

pub mod email;
pub mod entities;
pub mod errors;
pub mod payloads;
pub mod price;
pub mod schema;

pub use email::normalize_email;
pub use errors::CoreError;
pub use price::Price;
