//! Token authentication extractor.
//!
//! Accepts `Authorization: Token <key>` and `Authorization: Bearer <key>`.
//! A missing header, an unknown scheme, an unknown key, and a key whose
//! owner is inactive all reject with 401.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use recipe_core::entities::User;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Extract the key from an `Authorization` header value.
fn token_from_header(value: &str) -> Option<&str> {
    let (scheme, key) = value.trim().split_once(' ')?;
    let key = key.trim();
    let accepted =
        scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer");
    (accepted && !key.is_empty()).then_some(key)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(token_from_header)
            .ok_or(ApiError::Unauthorized)?;

        state
            .service
            .user_for_token(key)
            .await?
            .map(Self)
            .ok_or(ApiError::Unauthorized)
    }
}
