use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, AppResult};

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("email regex is valid")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Lowercases and trims an email, rejecting anything that does not look like one.
pub fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::validation("Invalid email address"));
    }
    Ok(email)
}

/// Fails with one message naming every blank field.
pub fn require_fields(fields: &[(&str, Option<&str>)]) -> AppResult<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.map(|v| v.trim().is_empty()).unwrap_or(true))
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

pub fn check_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        assert!(is_valid_email("jane.doe@example.com"));
        assert!(is_valid_email("a-b@mail.example.co"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("jane@example.comma"));
    }

    #[test]
    fn normalize_lowercases() {
        assert_eq!(
            normalize_email("  Jane@Example.COM ").unwrap(),
            "jane@example.com"
        );
    }

    #[test]
    fn require_fields_lists_all_missing() {
        let err = require_fields(&[("email", Some("a@b.com")), ("password", None), ("fullName", Some("  "))])
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: password, fullName");
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(check_password("12345").is_err());
        assert!(check_password("123456").is_ok());
    }
}
