//! JSON Schemas for the API's entities and payloads.
//!
//! Every schema is generated with schemars and keyed by its type name.
//! Cross-references point at `#/components/schemas/<Name>`, so the map
//! drops straight into the `components` section of an OpenAPI 3.1
//! document.

use schemars::generate::SchemaSettings;
use serde_json::{Map, Value};

use crate::entities::{Ingredient, Recipe, Tag, User};
use crate::payloads::{Credentials, NewRecipe, NewUser, RecipePatch, TokenResponse, UserPatch};

/// Where component schemas live inside the OpenAPI document.
pub const COMPONENTS_PATH: &str = "/components/schemas";

/// `$ref` value for a registered component.
#[must_use]
pub fn schema_ref(name: &str) -> String {
    format!("#{COMPONENTS_PATH}/{name}")
}

/// Name → schema for every public API type and everything they reference.
#[must_use]
pub fn component_schemas() -> Map<String, Value> {
    let mut generator = SchemaSettings::draft2020_12()
        .with(|settings| settings.definitions_path = COMPONENTS_PATH.into())
        .into_generator();

    generator.subschema_for::<User>();
    generator.subschema_for::<Recipe>();
    generator.subschema_for::<Tag>();
    generator.subschema_for::<Ingredient>();

    generator.subschema_for::<NewUser>();
    generator.subschema_for::<UserPatch>();
    generator.subschema_for::<Credentials>();
    generator.subschema_for::<TokenResponse>();
    generator.subschema_for::<NewRecipe>();
    generator.subschema_for::<RecipePatch>();

    generator.take_definitions(true)
}
