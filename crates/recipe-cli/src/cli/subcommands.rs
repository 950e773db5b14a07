use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Account administration.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Create an account.
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        name: String,
        /// Grant staff and superuser flags.
        #[arg(long)]
        superuser: bool,
    },
}

/// Edge proxy configuration and launch.
#[derive(Clone, Debug, Subcommand)]
pub enum ProxyCommands {
    /// Render the template without starting the proxy.
    Render(RenderArgs),
    /// Render, write atomically, then replace this process with the proxy.
    Run(RunArgs),
}

#[derive(Clone, Debug, Args)]
pub struct RenderArgs {
    /// Template to read (overrides `proxy.template_path`).
    #[arg(long)]
    pub template: Option<PathBuf>,
    /// Destination file, or `-` for stdout (overrides `proxy.output_path`).
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct RunArgs {
    /// Template to read (overrides `proxy.template_path`).
    #[arg(long)]
    pub template: Option<PathBuf>,
    /// Destination file (overrides `proxy.output_path`).
    #[arg(long)]
    pub output: Option<PathBuf>,
}
