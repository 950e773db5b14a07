//! Recipe, tag, and ingredient endpoints under `/api/recipe/`.
//!
//! Every handler is scoped to the authenticated user.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use recipe_core::entities::{Ingredient, Recipe, Tag};
use recipe_core::payloads::{NewRecipe, RecipePatch};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    Ok(Json(state.service.list_recipes(user.id).await?))
}

pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<NewRecipe>, JsonRejection>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let Json(new) = payload?;
    let recipe = state.service.create_recipe(user.id, &new).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Recipe>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.service.get_recipe(user.id, id).await?))
}

pub async fn replace_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NewRecipe>, JsonRejection>,
) -> Result<Json<Recipe>, ApiError> {
    let Path(id) = id?;
    let Json(full) = payload?;
    Ok(Json(state.service.replace_recipe(user.id, id, full).await?))
}

pub async fn patch_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<RecipePatch>, JsonRejection>,
) -> Result<Json<Recipe>, ApiError> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    Ok(Json(state.service.patch_recipe(user.id, id, &patch).await?))
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.service.delete_recipe(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_tags(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(state.service.list_tags(user.id).await?))
}

pub async fn list_ingredients(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Ingredient>>, ApiError> {
    Ok(Json(state.service.list_ingredients(user.id).await?))
}
