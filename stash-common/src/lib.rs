//! Stash Common Library
//!
//! Wire protocol, payload codecs, validators, and a small async client
//! shared by the Stash server and its tools.

pub mod client;
pub mod framing;
pub mod io;
pub mod protocol;
pub mod validators;

/// Default port for Stash connections
pub const DEFAULT_PORT: u16 = 2209;

/// Width of the fixed header that precedes uploaded file bytes (`AddFile`)
pub const UPLOAD_HEADER_SIZE: usize = 256;

/// Width of the fixed header that precedes downloaded file bytes (`DownloadSuccess`)
pub const DOWNLOAD_HEADER_SIZE: usize = 128;

/// Separator between fields of delimited text payloads
pub const FIELD_SEPARATOR: char = ';';

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port() {
        assert_eq!(DEFAULT_PORT, 2209);
    }

    #[test]
    fn test_header_sizes() {
        // Upload header carries two path fields, download header only a name and size
        assert!(UPLOAD_HEADER_SIZE > DOWNLOAD_HEADER_SIZE);
        assert_eq!(UPLOAD_HEADER_SIZE, 256);
        assert_eq!(DOWNLOAD_HEADER_SIZE, 128);
    }
}
