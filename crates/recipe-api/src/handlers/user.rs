//! Account endpoints under `/api/user/`.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use recipe_core::entities::User;
use recipe_core::payloads::{Credentials, NewUser, TokenResponse, UserPatch};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// `POST /api/user/create/`
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(new) = payload?;
    let user = state.service.create_user(&new).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /api/user/token/`
pub async fn create_token(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(credentials) = payload?;
    let user = state
        .service
        .authenticate(&credentials.email, &credentials.password)
        .await?;
    let token = state.service.issue_token(user.id).await?;
    Ok(Json(TokenResponse { token }))
}

/// `GET /api/user/me/`
pub async fn me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

/// `PATCH /api/user/me/`
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(patch) = payload?;
    let updated = state.service.update_user(user.id, &patch).await?;
    Ok(Json(updated))
}
