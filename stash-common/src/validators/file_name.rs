//! File and folder name validation
//!
//! Names created by `AddFolder` and `AddFile` must be a single path segment
//! that can also be carried inside a `parent;name` payload.

/// Maximum length for names in bytes
pub const MAX_FILE_NAME_LENGTH: usize = 255;

/// Validation error for file and folder names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileNameError {
    /// Name is empty
    Empty,
    /// Name exceeds maximum length
    TooLong,
    /// Name is `.` or `..`
    Reserved,
    /// Name contains `/` or `\`
    ContainsPathSeparator,
    /// Name contains the `;` field separator
    ContainsFieldSeparator,
    /// Name contains a control character (including NUL)
    InvalidCharacters,
    /// Name starts or ends with whitespace
    SurroundingWhitespace,
}

/// Validate a single file or folder name
///
/// # Errors
///
/// Returns a `FileNameError` variant describing the validation failure.
pub fn validate_file_name(name: &str) -> Result<(), FileNameError> {
    if name.is_empty() {
        return Err(FileNameError::Empty);
    }
    if name.len() > MAX_FILE_NAME_LENGTH {
        return Err(FileNameError::TooLong);
    }
    if name == "." || name == ".." {
        return Err(FileNameError::Reserved);
    }
    if name.trim() != name {
        return Err(FileNameError::SurroundingWhitespace);
    }

    for ch in name.chars() {
        match ch {
            '/' | '\\' => return Err(FileNameError::ContainsPathSeparator),
            ';' => return Err(FileNameError::ContainsFieldSeparator),
            c if c.is_control() => return Err(FileNameError::InvalidCharacters),
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_file_name("Documents").is_ok());
        assert!(validate_file_name("My Files").is_ok());
        assert!(validate_file_name("report.final.pdf").is_ok());
        assert!(validate_file_name(".hidden").is_ok());
        assert!(validate_file_name("...").is_ok());
        assert!(validate_file_name("a,b.txt").is_ok());
        assert!(validate_file_name("日本語フォルダ").is_ok());
        assert!(validate_file_name(&"a".repeat(MAX_FILE_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn test_empty_and_long() {
        assert_eq!(validate_file_name(""), Err(FileNameError::Empty));
        assert_eq!(
            validate_file_name(&"a".repeat(MAX_FILE_NAME_LENGTH + 1)),
            Err(FileNameError::TooLong)
        );
    }

    #[test]
    fn test_reserved() {
        assert_eq!(validate_file_name("."), Err(FileNameError::Reserved));
        assert_eq!(validate_file_name(".."), Err(FileNameError::Reserved));
    }

    #[test]
    fn test_separators() {
        assert_eq!(
            validate_file_name("a/b"),
            Err(FileNameError::ContainsPathSeparator)
        );
        assert_eq!(
            validate_file_name("a\\b"),
            Err(FileNameError::ContainsPathSeparator)
        );
        assert_eq!(
            validate_file_name("a;b"),
            Err(FileNameError::ContainsFieldSeparator)
        );
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(
            validate_file_name("a\0b"),
            Err(FileNameError::InvalidCharacters)
        );
        assert_eq!(
            validate_file_name("a\x1Bb"),
            Err(FileNameError::InvalidCharacters)
        );
    }

    #[test]
    fn test_whitespace_edges() {
        assert_eq!(
            validate_file_name(" docs"),
            Err(FileNameError::SurroundingWhitespace)
        );
        assert_eq!(
            validate_file_name("docs "),
            Err(FileNameError::SurroundingWhitespace)
        );
        assert_eq!(
            validate_file_name("  "),
            Err(FileNameError::SurroundingWhitespace)
        );
    }
}
