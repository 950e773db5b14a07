//! # recipe-proxy
//!
//! Edge container entrypoint: render the reverse-proxy configuration from
//! environment variables, then hand the process over to the proxy.
//!
//! The pipeline is strictly sequential and all-or-nothing:
//! 1. [`template::render`] — pure `(template, environment) → text`
//! 2. [`write::write_atomic`] — temp file + fsync + rename
//! 3. [`launch::Handoff`] — `exec` the proxy in the foreground
//!
//! A failure in step 1 or 2 aborts before the proxy is started, so the proxy
//! never loads a stale or partial configuration.

pub mod error;
pub mod launch;
pub mod template;
pub mod write;

pub use error::ProxyError;
pub use launch::{ExecHandoff, Handoff, Launcher, ProxyCommand, RenderReport, process_environment};
pub use template::{Environment, RenderOptions, Rendered, find_placeholders, render};
pub use write::write_atomic;
