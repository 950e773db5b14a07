//! Edge proxy launcher configuration.
//!
//! Controls where the template is read from, where the rendered
//! configuration lands, how placeholders are recognised, and which program
//! takes over the process once rendering succeeds.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What to substitute for a placeholder whose variable is not set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsetPolicy {
    /// Replace with the empty string (what `envsubst` does).
    #[default]
    Empty,
    /// Leave the placeholder text exactly as written.
    Passthrough,
    /// Fail the render and name every missing variable.
    Strict,
}

impl UnsetPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Passthrough => "passthrough",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for UnsetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which placeholder forms are recognised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderSyntax {
    /// Both `$NAME` and `${NAME}`.
    #[default]
    Shell,
    /// Only `${NAME}`. Leaves bare `$host`-style proxy variables alone.
    Braced,
}

impl PlaceholderSyntax {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shell => "shell",
            Self::Braced => "braced",
        }
    }
}

impl fmt::Display for PlaceholderSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_template_path() -> PathBuf {
    PathBuf::from("/etc/nginx/default.conf.tpl")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("/etc/nginx/conf.d/default.conf")
}

fn default_program() -> String {
    "nginx".to_string()
}

fn default_args() -> Vec<String> {
    vec!["-g".to_string(), "daemon off;".to_string()]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// Template with placeholders.
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,

    /// Rendered configuration the proxy loads on startup.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Program that replaces the launcher after rendering.
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments passed to `program`.
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    #[serde(default)]
    pub unset_policy: UnsetPolicy,

    #[serde(default)]
    pub syntax: PlaceholderSyntax,

    /// Variable names eligible for substitution. Empty means every name.
    /// Placeholders naming anything else are left verbatim.
    #[serde(default)]
    pub variables: Vec<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            template_path: default_template_path(),
            output_path: default_output_path(),
            program: default_program(),
            args: default_args(),
            unset_policy: UnsetPolicy::default(),
            syntax: PlaceholderSyntax::default(),
            variables: Vec::new(),
        }
    }
}

impl ProxyConfig {
    /// Check values that deserialize fine but cannot work at launch time.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty program, identical
    /// template and output paths, or an allow-listed name that is not a
    /// valid variable identifier.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.program.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "proxy.program".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.template_path == self.output_path {
            return Err(ConfigError::InvalidValue {
                field: "proxy.output_path".into(),
                reason: "must differ from proxy.template_path".into(),
            });
        }
        if let Some(bad) = self.variables.iter().find(|name| !is_variable_name(name)) {
            return Err(ConfigError::InvalidValue {
                field: "proxy.variables".into(),
                reason: format!("'{bad}' is not a valid variable name"),
            });
        }
        Ok(())
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
