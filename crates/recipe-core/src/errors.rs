//! Cross-cutting error types.
//!
//! Storage and transport errors live in their own crates and wrap
//! `CoreError` where a validation failure bubbles up through them.

use thiserror::Error;

/// Errors that can be raised by any recipes crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (format, length, range).
    #[error("{field}: {reason}")]
    Validation { field: String, reason: String },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Shorthand for a field-level validation failure.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
