//! Form validation run before any network call.
//!
//! Messages match the ones the server answers with, so the user sees the
//! same text whichever side catches the problem.

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

pub const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Password must contain at least 6 character(s)")]
    PasswordTooShort,
    #[error("Password is required")]
    PasswordMissing,
}

/// Shape check for `local@domain.tld`, with the same rules the server
/// applies. Surrounding whitespace is ignored.
///
/// The local part may not start or end with a dot or hold two in a row.
/// Domain labels are ASCII letters, digits and inner hyphens. The TLD is at
/// least two letters.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    labels_ok && labels.last().is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}

/// # Errors
///
/// `InvalidEmail` or `PasswordMissing`. Length is not checked on sign-in.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if password.is_empty() {
        return Err(ValidationError::PasswordMissing);
    }
    Ok(())
}

/// # Errors
///
/// `InvalidEmail` or `PasswordTooShort`.
pub fn validate_registration(email: &str, password: &str) -> Result<(), ValidationError> {
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}
