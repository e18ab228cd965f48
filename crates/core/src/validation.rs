//! Input validation for account signup.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Minimum password length used when `PASSWORD_MIN_LENGTH` is not configured.
pub const DEFAULT_PASSWORD_MIN_LENGTH: usize = 8;

/// Validate a signup payload: non-empty name, well-formed email, and a
/// password of at least `min_password_length` characters.
pub fn validate_signup(
    name: &str,
    email: &str,
    password: &str,
    min_password_length: usize,
) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Name must not be empty".into()));
    }
    if !email.validate_email() {
        return Err(CoreError::Validation(format!("Invalid email address '{email}'")));
    }
    if password.chars().count() < min_password_length {
        return Err(CoreError::Validation(format!(
            "Password must be at least {min_password_length} characters long"
        )));
    }
    Ok(())
}

/// Normalize an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
