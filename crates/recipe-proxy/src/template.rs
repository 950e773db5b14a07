//! Placeholder scanning and substitution.
//!
//! Rendering is a pure function of the template text, an environment map,
//! and [`RenderOptions`]. It performs no I/O, so the same inputs always give
//! byte-identical output.
//!
//! Recognised forms:
//! - `${NAME}` always;
//! - `$NAME` when the syntax is [`PlaceholderSyntax::Shell`].
//!
//! `NAME` is `[A-Za-z_][A-Za-z0-9_]*`. Anything else after a `$` (including
//! `${NAME:-default}` and an unterminated `${NAME`) is copied literally.

use std::collections::{BTreeSet, HashMap};

use recipe_config::{PlaceholderSyntax, ProxyConfig, UnsetPolicy};

use crate::error::ProxyError;

/// Variable name → value, as seen by the launcher at startup.
pub type Environment = HashMap<String, String>;

/// How placeholders are recognised and resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub policy: UnsetPolicy,
    pub syntax: PlaceholderSyntax,
    /// Names eligible for substitution. `None` means every name.
    pub allow: Option<BTreeSet<String>>,
}

impl RenderOptions {
    #[must_use]
    pub fn from_config(config: &ProxyConfig) -> Self {
        let allow = if config.variables.is_empty() {
            None
        } else {
            Some(config.variables.iter().cloned().collect())
        };
        Self {
            policy: config.unset_policy,
            syntax: config.syntax,
            allow,
        }
    }

    fn eligible(&self, name: &str) -> bool {
        self.allow.as_ref().is_none_or(|allow| allow.contains(name))
    }
}

/// A rendered template plus what happened to each placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// Names that were set and substituted.
    pub substituted: BTreeSet<String>,
    /// Names that were referenced but unset (resolved per policy).
    pub missing: BTreeSet<String>,
}

/// One recognised placeholder within a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub name: &'a str,
    /// Byte range of the whole token, `$` included.
    pub start: usize,
    pub end: usize,
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Length of the variable name starting at `from`, or 0 if none starts there.
fn name_len(bytes: &[u8], from: usize) -> usize {
    match bytes.get(from) {
        Some(&b) if is_name_start(b) => bytes[from..]
            .iter()
            .take_while(|&&b| is_name_char(b))
            .count(),
        _ => 0,
    }
}

/// Try to read a placeholder at byte offset `at`, which holds a `$`.
fn placeholder_at(text: &str, at: usize, syntax: PlaceholderSyntax) -> Option<Placeholder<'_>> {
    let bytes = text.as_bytes();
    match bytes.get(at + 1) {
        Some(b'{') => {
            let name_start = at + 2;
            let len = name_len(bytes, name_start);
            let close = name_start + len;
            (len > 0 && bytes.get(close) == Some(&b'}')).then(|| Placeholder {
                name: &text[name_start..close],
                start: at,
                end: close + 1,
            })
        }
        Some(_) if syntax == PlaceholderSyntax::Shell => {
            let name_start = at + 1;
            let len = name_len(bytes, name_start);
            (len > 0).then(|| Placeholder {
                name: &text[name_start..name_start + len],
                start: at,
                end: name_start + len,
            })
        }
        _ => None,
    }
}

/// List every placeholder in `text`, in order of appearance.
#[must_use]
pub fn find_placeholders(text: &str, syntax: PlaceholderSyntax) -> Vec<Placeholder<'_>> {
    let mut found = Vec::new();
    let mut pos = 0;
    while let Some(offset) = text[pos..].find('$') {
        let at = pos + offset;
        match placeholder_at(text, at, syntax) {
            Some(placeholder) => {
                pos = placeholder.end;
                found.push(placeholder);
            }
            None => pos = at + 1,
        }
    }
    found
}

/// Substitute environment values into `template`.
///
/// Placeholders whose name is outside the allow-list are copied verbatim and
/// are not reported as missing. A variable that is set to the empty string
/// counts as set.
///
/// # Errors
///
/// Returns `ProxyError::MissingVariables` under [`UnsetPolicy::Strict`] when
/// any eligible placeholder names an unset variable. Every missing name is
/// reported, not just the first.
pub fn render(
    template: &str,
    env: &Environment,
    options: &RenderOptions,
) -> Result<Rendered, ProxyError> {
    let mut text = String::with_capacity(template.len());
    let mut substituted = BTreeSet::new();
    let mut missing = BTreeSet::new();
    let mut copied_to = 0;

    for placeholder in find_placeholders(template, options.syntax) {
        text.push_str(&template[copied_to..placeholder.start]);
        copied_to = placeholder.end;
        let original = &template[placeholder.start..placeholder.end];

        if !options.eligible(placeholder.name) {
            text.push_str(original);
            continue;
        }

        if let Some(value) = env.get(placeholder.name) {
            text.push_str(value);
            substituted.insert(placeholder.name.to_string());
            continue;
        }

        missing.insert(placeholder.name.to_string());
        match options.policy {
            UnsetPolicy::Empty | UnsetPolicy::Strict => {}
            UnsetPolicy::Passthrough => text.push_str(original),
        }
    }
    text.push_str(&template[copied_to..]);

    if options.policy == UnsetPolicy::Strict && !missing.is_empty() {
        return Err(ProxyError::MissingVariables { names: missing });
    }

    Ok(Rendered {
        text,
        substituted,
        missing,
    })
}
