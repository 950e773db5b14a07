//! Unauthenticated service endpoints.

use axum::{
    Json,
    response::{Html, IntoResponse},
};
use serde_json::json;

use crate::openapi::{DOCS_PAGE, openapi_document};

/// `GET /api/health/`. The proxy's upstream probe.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// `GET /api/schema/`: the OpenAPI document.
pub async fn schema() -> impl IntoResponse {
    Json(openapi_document())
}

/// `GET /api/docs/`: Swagger UI over `/api/schema/`.
pub async fn docs() -> impl IntoResponse {
    Html(DOCS_PAGE)
}
