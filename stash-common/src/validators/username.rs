//! Username validation
//!
//! A username doubles as the name of the account's storage directory and as
//! the first segment of every path the account may touch.

/// Maximum length for usernames in characters
pub const MAX_USERNAME_LENGTH: usize = 32;

/// Characters that would break a path segment or a `user;pass` payload
const FORBIDDEN_CHARS: &[char] = &[
    '/', '\\', ':', '.', '<', '>', '"', '|', '?', '*', ';', ',',
];

/// Validation error for usernames
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    /// Username is empty
    Empty,
    /// Username exceeds maximum length
    TooLong,
    /// Username contains whitespace, control, or path-sensitive characters
    InvalidCharacters,
}

/// Validate a username for sign-up
///
/// Letters from any script and printable ASCII are allowed, except
/// `/ \ : . < > " | ? * ; ,`. Whitespace and control characters are
/// rejected.
///
/// # Errors
///
/// Returns a `UsernameError` variant describing the validation failure.
pub fn validate_username(username: &str) -> Result<(), UsernameError> {
    if username.is_empty() {
        return Err(UsernameError::Empty);
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(UsernameError::TooLong);
    }
    let valid = username.chars().all(|ch| {
        !FORBIDDEN_CHARS.contains(&ch) && (ch.is_alphabetic() || ch.is_ascii_graphic())
    });
    if !valid {
        return Err(UsernameError::InvalidCharacters);
    }
    Ok(())
}

/// Key used to compare usernames case-insensitively
pub fn username_key(username: &str) -> String {
    username.to_lowercase()
}
