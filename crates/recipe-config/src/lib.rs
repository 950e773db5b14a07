//! # recipe-config
//!
//! Layered configuration loading for the recipes API and the edge proxy
//! launcher, using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`RECIPES_*` prefix, `__` as separator)
//! 2. An explicit file passed with `--config`, else project-level `recipes.toml`
//! 3. User-level `~/.config/recipes/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `RECIPES_SERVER__PORT` -> `server.port`,
//! `RECIPES_PROXY__UNSET_POLICY` -> `proxy.unset_policy`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use recipe_config::RecipeConfig;
//!
//! let config = RecipeConfig::load_with_dotenv(None).expect("config");
//! println!("API binds {}", config.server.bind_address());
//! ```

mod database;
mod error;
mod proxy;
mod server;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use proxy::{PlaceholderSyntax, ProxyConfig, UnsetPolicy};
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "RECIPES_";

/// Project-local config file name.
pub const LOCAL_CONFIG_FILE: &str = "recipes.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecipeConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
}

impl RecipeConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an explicit file is missing, extraction fails,
    /// or a value does not pass [`Self::validate`].
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(explicit)?.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Loads `.env` from the current directory (if present) before building
    /// the figment. This is the typical entry point for the CLI.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(explicit)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on
    /// top.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingFile` if `explicit` names a file that
    /// does not exist.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Explicit file, else project-local config
        match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigError::MissingFile {
                    path: path.display().to_string(),
                });
            }
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
                if local_path.exists() {
                    figment = figment.merge(Toml::file(local_path));
                }
            }
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Ok(figment)
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::InvalidValue` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".into(),
                reason: "must be non-zero".into(),
            });
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        self.proxy.validate()
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("recipes").join("config.toml"))
    }
}
