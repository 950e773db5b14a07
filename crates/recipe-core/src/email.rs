//! Email normalization for user accounts.

use crate::errors::CoreError;

/// Normalize an email address the way account lookups expect it.
///
/// Surrounding whitespace is trimmed and the domain part is lowercased. The
/// local part is left untouched because mailbox names may be case-sensitive.
///
/// # Errors
///
/// Returns `CoreError::Validation` if the address is empty or has no `@`
/// separating a non-empty local part from a non-empty domain.
pub fn normalize_email(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation(
            "email",
            "users must have an email address",
        ));
    }

    let (local, domain) = trimmed
        .rsplit_once('@')
        .ok_or_else(|| CoreError::validation("email", "enter a valid email address"))?;
    if local.is_empty() || domain.is_empty() {
        return Err(CoreError::validation("email", "enter a valid email address"));
    }

    Ok(format!("{local}@{}", domain.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("test1@EXAMPLE.COM", "test1@example.com")]
    #[case("Test2@Example.COM", "Test2@example.com")]
    #[case("TEST3@EXAMPLE.COM", "TEST3@example.com")]
    #[case("test4@example.COM", "test4@example.com")]
    #[case("  padded@Example.org ", "padded@example.org")]
    fn domain_is_lowercased(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_email(raw).unwrap(), expected);
    }

    #[test]
    fn empty_email_is_rejected() {
        let err = normalize_email("").unwrap_err();
        assert!(err.to_string().contains("must have an email"));
        assert!(normalize_email("   ").is_err());
    }

    #[test]
    fn address_without_domain_is_rejected() {
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("user@").is_err());
        assert!(normalize_email("@example.com").is_err());
    }
}
