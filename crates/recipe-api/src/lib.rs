//! # recipe-api
//!
//! The application container's HTTP surface: account management, token
//! login, and owner-scoped recipe, tag, and ingredient endpoints, served by
//! axum behind the edge proxy.
//!
//! Routes keep their trailing slashes; the proxy forwards paths unchanged.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod state;

use std::future::Future;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::get,
    routing::post,
};
use recipe_config::ServerConfig;
use tokio::net::TcpListener;
use tokio::signal::{self, ctrl_c};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ApiError;
pub use state::AppState;

use handlers::{meta, recipe, user};

/// Assemble the router with body limit, optional CORS, and request tracing.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let mut app = Router::new()
        .route("/api/health/", get(meta::health))
        .route("/api/schema/", get(meta::schema))
        .route("/api/docs/", get(meta::docs))
        .route("/api/user/create/", post(user::create_user))
        .route("/api/user/token/", post(user::create_token))
        .route("/api/user/me/", get(user::me).patch(user::update_me))
        .route(
            "/api/recipe/recipes/",
            get(recipe::list_recipes).post(recipe::create_recipe),
        )
        .route(
            "/api/recipe/recipes/{id}/",
            get(recipe::get_recipe)
                .put(recipe::replace_recipe)
                .patch(recipe::patch_recipe)
                .delete(recipe::delete_recipe),
        )
        .route("/api/recipe/tags/", get(recipe::list_tags))
        .route("/api/recipe/ingredients/", get(recipe::list_ingredients))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(config.max_body_bytes)),
        );

    if let Some(cors) = cors_layer(&config.cors_allowed_origins) {
        app = app.layer(cors);
    }

    app.with_state(state)
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }
    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    )
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
///
/// # Errors
///
/// Returns the I/O error if the server fails while accepting connections.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(address) = listener.local_addr() {
        info!(%address, "API listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("API shut down");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
