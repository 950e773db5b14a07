use anyhow::Context;
use recipe_config::RecipeConfig;
use recipe_db::RecipeDb;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `recipes migrate`.
pub async fn handle(config: &RecipeConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let db = RecipeDb::open_local(&config.database.path)
        .await
        .with_context(|| format!("failed to open database '{}'", config.database.path))?;
    let tables = db.tables().await?;
    tracing::info!(path = %config.database.path, tables = tables.len(), "schema applied");

    output(
        &json!({ "database": config.database.path, "tables": tables }),
        flags.format,
    )
}
