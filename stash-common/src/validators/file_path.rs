//! File path validation
//!
//! Wire paths are relative to the storage area and use `/` separators:
//! `alice`, `alice/docs`, `alice/docs/a.txt`. This validator checks shape
//! only; ownership (the first segment must be the caller) is checked by the
//! server.

/// Maximum length for file paths in bytes
pub const MAX_FILE_PATH_LENGTH: usize = 4096;

/// Validation error for file paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilePathError {
    /// Path is empty
    Empty,
    /// Path exceeds maximum length
    TooLong,
    /// Path starts with `/`
    Absolute,
    /// Path contains a `\` (only `/` separates segments)
    ContainsBackslash,
    /// Path contains an empty, `.` or `..` segment
    InvalidSegment,
    /// Path contains a control character (including NUL)
    InvalidCharacters,
}

/// Validate a wire path and return its segments
///
/// # Errors
///
/// Returns a `FilePathError` variant describing the validation failure.
pub fn validate_file_path(path: &str) -> Result<Vec<&str>, FilePathError> {
    if path.is_empty() {
        return Err(FilePathError::Empty);
    }
    if path.len() > MAX_FILE_PATH_LENGTH {
        return Err(FilePathError::TooLong);
    }
    if path.starts_with('/') {
        return Err(FilePathError::Absolute);
    }
    if path.contains('\\') {
        return Err(FilePathError::ContainsBackslash);
    }
    if path.chars().any(char::is_control) {
        return Err(FilePathError::InvalidCharacters);
    }

    let segments: Vec<&str> = path.split('/').collect();
    if segments
        .iter()
        .any(|segment| segment.is_empty() || *segment == "." || *segment == "..")
    {
        return Err(FilePathError::InvalidSegment);
    }

    Ok(segments)
}
