//! Launcher error types.

use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from rendering the proxy configuration or handing off to the proxy.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The template could not be read.
    #[error("cannot read template '{}': {source}", path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Strict policy: one or more referenced variables are unset.
    #[error("template references unset variables: {}", join(names))]
    MissingVariables { names: BTreeSet<String> },

    /// The output path resolves to the template itself.
    #[error("rendered config '{}' would overwrite its own template", path.display())]
    OutputIsTemplate { path: PathBuf },

    /// The rendered configuration could not be written in place.
    #[error("cannot write rendered config '{}': {detail}", path.display())]
    Write { path: PathBuf, detail: String },

    /// The proxy program could not be started.
    #[error("cannot start proxy '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Spawn fallback only: the proxy ran and exited with this status.
    #[error("proxy exited with status {0}")]
    Exited(i32),
}

fn join(names: &BTreeSet<String>) -> String {
    names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

impl ProxyError {
    /// Process exit status the launcher should terminate with.
    ///
    /// Follows shell conventions for start failures: 127 when the program
    /// is missing, 126 when it is not executable.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Launch { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => 127,
                io::ErrorKind::PermissionDenied => 126,
                _ => 1,
            },
            Self::Exited(code) => *code,
            _ => 1,
        }
    }
}
