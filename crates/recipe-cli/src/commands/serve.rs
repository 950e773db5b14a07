use anyhow::Context;
use recipe_api::{AppState, build_router, serve, shutdown_signal};
use recipe_config::RecipeConfig;
use recipe_db::service::RecipeService;
use tokio::net::TcpListener;

/// Handle `recipes serve`.
pub async fn handle(config: &RecipeConfig) -> anyhow::Result<()> {
    if config.database.is_in_memory() {
        tracing::warn!("serving from an in-memory database; data is lost on shutdown");
    }
    let service = RecipeService::new_local(&config.database.path)
        .await
        .with_context(|| format!("failed to open database '{}'", config.database.path))?;

    let app = build_router(AppState::new(service), &config.server);
    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    serve(listener, app, shutdown_signal())
        .await
        .context("API server failed")
}
