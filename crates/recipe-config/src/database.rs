//! Database location.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    "recipes.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the libSQL database file, or `:memory:`.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl DatabaseConfig {
    /// True for libSQL's `:memory:` path, which keeps nothing across restarts.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_memory_path_is_in_memory() {
        assert!(!DatabaseConfig::default().is_in_memory());
        let memory = DatabaseConfig {
            path: ":memory:".into(),
        };
        assert!(memory.is_in_memory());
    }
}
