//! Password validation
//!
//! - `validate_password_input` - for sign-in (only the length is checked)
//! - `validate_password` - for sign-up

/// Maximum length for passwords in bytes
///
/// Bounds the work done by Argon2 for a single request.
pub const MAX_PASSWORD_LENGTH: usize = 256;

/// Validation error for passwords
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// Password is empty
    Empty,
    /// Password exceeds maximum length
    TooLong,
    /// Password contains the `;` field separator
    ContainsSeparator,
}

/// Validate a password presented at sign-in
///
/// # Errors
///
/// Returns `PasswordError::TooLong` past [`MAX_PASSWORD_LENGTH`] bytes.
pub fn validate_password_input(password: &str) -> Result<(), PasswordError> {
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::TooLong);
    }
    Ok(())
}

/// Validate a password chosen at sign-up
///
/// The password travels as the second field of `user;pass`, so it cannot
/// contain `;`. Anything else goes, including spaces and control characters.
///
/// # Errors
///
/// Returns a `PasswordError` variant describing the validation failure.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::Empty);
    }
    validate_password_input(password)?;
    if password.contains(crate::FIELD_SEPARATOR) {
        return Err(PasswordError::ContainsSeparator);
    }
    Ok(())
}
