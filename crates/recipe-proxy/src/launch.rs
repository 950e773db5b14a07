//! Render-then-exec pipeline for the edge container entrypoint.
//!
//! ```text
//! read template ──► render ──► write atomically ──► hand off to proxy
//!        │             │               │                    │
//!        └─────────────┴───────────────┴── any error ──► exit non-zero,
//!                                                        proxy never started
//! ```
//!
//! On unix the hand-off replaces the launcher's process image, so the proxy
//! inherits the PID, signals, and stdio and the container lives exactly as
//! long as the proxy does.

use std::convert::Infallible;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use recipe_config::ProxyConfig;
use tracing::info;

use crate::error::ProxyError;
use crate::template::{Environment, RenderOptions, Rendered, render};
use crate::write::write_atomic;

/// The program and arguments that take over once rendering succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ProxyCommand {
    #[must_use]
    pub fn from_config(config: &ProxyConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }
}

/// Transfers control to the proxy process.
///
/// `hand_off` only returns when the transfer failed (or, for the spawn
/// fallback, when the proxy has already exited); the returned value is the
/// error the launcher exits with.
pub trait Handoff {
    fn hand_off(&self, command: &ProxyCommand) -> ProxyError;
}

/// Replaces the current process with the proxy (`execvp`).
///
/// Where process replacement is unavailable the proxy runs as a child and
/// its exit status is propagated once it terminates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecHandoff;

impl Handoff for ExecHandoff {
    #[cfg(unix)]
    fn hand_off(&self, command: &ProxyCommand) -> ProxyError {
        use std::os::unix::process::CommandExt;

        info!(program = %command.program, args = ?command.args, "exec proxy");
        let source = Command::new(&command.program).args(&command.args).exec();
        ProxyError::Launch {
            program: command.program.clone(),
            source,
        }
    }

    #[cfg(not(unix))]
    fn hand_off(&self, command: &ProxyCommand) -> ProxyError {
        info!(program = %command.program, args = ?command.args, "spawn proxy");
        match Command::new(&command.program).args(&command.args).status() {
            Ok(status) => ProxyError::Exited(status.code().unwrap_or(1)),
            Err(source) => ProxyError::Launch {
                program: command.program.clone(),
                source,
            },
        }
    }
}

/// Summary of a successful render, for logging and CLI output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub rendered: Rendered,
}

/// The edge entrypoint: renders the configured template, then hands off.
#[derive(Debug, Clone)]
pub struct Launcher {
    template_path: PathBuf,
    output_path: PathBuf,
    options: RenderOptions,
    command: ProxyCommand,
}

impl Launcher {
    #[must_use]
    pub fn from_config(config: &ProxyConfig) -> Self {
        Self {
            template_path: config.template_path.clone(),
            output_path: config.output_path.clone(),
            options: RenderOptions::from_config(config),
            command: ProxyCommand::from_config(config),
        }
    }

    /// Override the template location (e.g. from a CLI flag).
    #[must_use]
    pub fn with_template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = path.into();
        self
    }

    /// Override the rendered config location.
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    #[must_use]
    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    #[must_use]
    pub const fn command(&self) -> &ProxyCommand {
        &self.command
    }

    /// Read and render the template without writing anything.
    ///
    /// # Errors
    ///
    /// Returns `ProxyError::TemplateRead` if the template cannot be read, or
    /// `ProxyError::MissingVariables` under the strict policy.
    pub fn render(&self, env: &Environment) -> Result<Rendered, ProxyError> {
        let template =
            fs::read_to_string(&self.template_path).map_err(|source| ProxyError::TemplateRead {
                path: self.template_path.clone(),
                source,
            })?;
        render(&template, env, &self.options)
    }

    /// Render and atomically write the configuration.
    ///
    /// # Errors
    ///
    /// `ProxyError::OutputIsTemplate` when both paths name the same file,
    /// otherwise any error from [`Self::render`] or [`write_atomic`].
    /// Nothing is written when rendering fails.
    pub fn prepare(&self, env: &Environment) -> Result<RenderReport, ProxyError> {
        if same_file(&self.template_path, &self.output_path) {
            return Err(ProxyError::OutputIsTemplate {
                path: self.output_path.clone(),
            });
        }
        let rendered = self.render(env)?;
        write_atomic(&self.output_path, &rendered.text)?;

        info!(
            template = %self.template_path.display(),
            output = %self.output_path.display(),
            substituted = rendered.substituted.len(),
            missing = rendered.missing.len(),
            "proxy config rendered"
        );
        for name in &rendered.missing {
            tracing::warn!(variable = %name, policy = %self.options.policy, "variable not set");
        }

        Ok(RenderReport {
            template_path: self.template_path.clone(),
            output_path: self.output_path.clone(),
            rendered,
        })
    }

    /// Render, write, then hand off to the proxy.
    ///
    /// Never returns `Ok`: success means this process has become the proxy.
    ///
    /// # Errors
    ///
    /// The render/write error (the proxy is then never started), or the
    /// hand-off error.
    pub fn run(&self, env: &Environment, handoff: &impl Handoff) -> Result<Infallible, ProxyError> {
        self.prepare(env)?;
        Err(handoff.hand_off(&self.command))
    }
}

/// Equal paths, or two existing paths that resolve to one file.
fn same_file(a: &Path, b: &Path) -> bool {
    a == b
        || matches!(
            (fs::canonicalize(a), fs::canonicalize(b)),
            (Ok(a), Ok(b)) if a == b
        )
}

/// Snapshot the process environment.
///
/// Variables whose name or value is not valid UTF-8 are skipped with a
/// warning; they cannot appear in a UTF-8 template anyway.
#[must_use]
pub fn process_environment() -> Environment {
    std::env::vars_os()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (Ok(key), Err(_)) => {
                tracing::warn!(variable = %key, "skipping variable with non-UTF-8 value");
                None
            }
            (Err(key), _) => {
                tracing::warn!(variable = ?key, "skipping variable with non-UTF-8 name");
                None
            }
        })
        .collect()
}
