use clap::Subcommand;

use crate::cli::subcommands::{ProxyCommands, UserCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API.
    Serve,
    /// Apply the database schema and list tables.
    Migrate,
    /// Account administration.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Edge proxy configuration and launch.
    Proxy {
        #[command(subcommand)]
        action: ProxyCommands,
    },
}
