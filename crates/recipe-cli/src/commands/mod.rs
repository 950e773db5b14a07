pub mod migrate;
pub mod proxy;
pub mod serve;
pub mod user;

use recipe_config::RecipeConfig;

use crate::cli::{Commands, GlobalFlags};

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Commands,
    config: RecipeConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Serve => serve::handle(&config).await,
        Commands::Migrate => migrate::handle(&config, flags).await,
        Commands::User { action } => user::handle(action, &config, flags).await,
        Commands::Proxy { action } => proxy::handle(&action, &config, flags),
    }
}
