use anyhow::Context;
use recipe_config::RecipeConfig;
use recipe_core::payloads::NewUser;
use recipe_db::service::RecipeService;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::output::output;

/// Handle `recipes user ...`.
pub async fn handle(
    action: UserCommands,
    config: &RecipeConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = RecipeService::new_local(&config.database.path)
        .await
        .with_context(|| format!("failed to open database '{}'", config.database.path))?;

    match action {
        UserCommands::Create {
            email,
            password,
            name,
            superuser,
        } => {
            let new = NewUser {
                email,
                password,
                name,
            };
            let user = if superuser {
                service.create_superuser(&new).await?
            } else {
                service.create_user(&new).await?
            };
            output(&user, flags.format)
        }
    }
}
