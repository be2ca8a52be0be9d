//! Payload codecs for the non-tree message bodies

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DOWNLOAD_HEADER_SIZE, FIELD_SEPARATOR, UPLOAD_HEADER_SIZE};

/// Separator between file name and size in the download header
const SIZE_SEPARATOR: char = ',';

/// Errors decoding or encoding a message payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("payload is not valid UTF-8")]
    NotUtf8,

    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("field {index} is empty")]
    EmptyField { index: usize },

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("header needs {needed} bytes but payload has {available}")]
    Truncated { needed: usize, available: usize },

    #[error("header text is {length} bytes, limit is {max}")]
    HeaderTooLong { length: usize, max: usize },

    #[error("invalid size field: {0:?}")]
    InvalidSize(String),

    #[error("header declares {declared} bytes but {actual} follow")]
    SizeMismatch { declared: u64, actual: u64 },
}

/// Decode a payload as UTF-8 text
pub fn decode_text(payload: &[u8]) -> Result<&str, PayloadError> {
    std::str::from_utf8(payload).map_err(|_| PayloadError::NotUtf8)
}

/// Split delimited text into exactly `expected` fields
///
/// Empty fields are allowed here; callers decide which fields may be empty.
///
/// # Errors
///
/// Returns `PayloadError::FieldCount` if the separator count is wrong.
pub fn split_fields(text: &str, expected: usize) -> Result<Vec<&str>, PayloadError> {
    let fields: Vec<&str> = text.split(FIELD_SEPARATOR).collect();
    if fields.len() != expected {
        return Err(PayloadError::FieldCount {
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

/// Read the text portion of a fixed-width header
///
/// The text ends at the first NUL; trailing spaces are padding as well.
fn header_text(header: &[u8]) -> Result<&str, PayloadError> {
    let end = header.iter().position(|&b| b == 0).unwrap_or(header.len());
    Ok(decode_text(&header[..end])?.trim_end_matches(' '))
}

/// Pad header text with NULs to `width` and append `data`
fn encode_with_header(text: &str, width: usize, data: &[u8]) -> Result<Vec<u8>, PayloadError> {
    if text.len() > width {
        return Err(PayloadError::HeaderTooLong {
            length: text.len(),
            max: width,
        });
    }
    let mut payload = Vec::with_capacity(width + data.len());
    payload.extend_from_slice(text.as_bytes());
    payload.resize(width, 0);
    payload.extend_from_slice(data);
    Ok(payload)
}

/// Sign-in and sign-up credentials: `user;pass`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Parse `user;pass`
    ///
    /// The username must be non-empty. An empty password parses; whether it
    /// is acceptable is up to the caller.
    pub fn parse(payload: &[u8]) -> Result<Self, PayloadError> {
        let fields = split_fields(decode_text(payload)?, 2)?;
        if fields[0].is_empty() {
            return Err(PayloadError::EmptyField { index: 0 });
        }
        Ok(Self {
            username: fields[0].to_string(),
            password: fields[1].to_string(),
        })
    }

    /// Encode as `user;pass`
    pub fn encode(&self) -> Vec<u8> {
        format!("{}{FIELD_SEPARATOR}{}", self.username, self.password).into_bytes()
    }
}

/// Folder creation request: `parent;name`
///
/// An empty parent denotes the caller's root folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRequest {
    pub parent: String,
    pub name: String,
}

impl FolderRequest {
    /// Parse `parent;name`; the name must be non-empty
    pub fn parse(payload: &[u8]) -> Result<Self, PayloadError> {
        let fields = split_fields(decode_text(payload)?, 2)?;
        if fields[1].is_empty() {
            return Err(PayloadError::EmptyField { index: 1 });
        }
        Ok(Self {
            parent: fields[0].to_string(),
            name: fields[1].to_string(),
        })
    }

    /// Encode as `parent;name`
    pub fn encode(&self) -> Vec<u8> {
        format!("{}{FIELD_SEPARATOR}{}", self.parent, self.name).into_bytes()
    }
}

/// Path-addressed request body (`Delete`, `Download`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRequest {
    pub path: String,
}

impl PathRequest {
    /// Parse `{"path": ...}`
    pub fn parse(payload: &[u8]) -> Result<Self, PayloadError> {
        serde_json::from_slice(payload).map_err(|e| PayloadError::InvalidJson(e.to_string()))
    }

    /// Encode as compact JSON
    pub fn encode(&self) -> Vec<u8> {
        // A struct with one string field always serializes
        serde_json::to_vec(self).unwrap_or_default()
    }
}

/// Upload header: 256 bytes of `parent;filename`, NUL-padded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadHeader {
    pub parent: String,
    pub filename: String,
}

impl UploadHeader {
    /// Build the `AddFile` payload: header followed by `data`
    ///
    /// # Errors
    ///
    /// Returns `PayloadError::HeaderTooLong` if the header text does not fit.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>, PayloadError> {
        let text = format!("{}{FIELD_SEPARATOR}{}", self.parent, self.filename);
        encode_with_header(&text, UPLOAD_HEADER_SIZE, data)
    }

    /// Split an `AddFile` payload into its header and the file bytes
    ///
    /// The filename must be non-empty; an empty parent denotes the root.
    pub fn decode(payload: &[u8]) -> Result<(Self, &[u8]), PayloadError> {
        if payload.len() < UPLOAD_HEADER_SIZE {
            return Err(PayloadError::Truncated {
                needed: UPLOAD_HEADER_SIZE,
                available: payload.len(),
            });
        }
        let (header, data) = payload.split_at(UPLOAD_HEADER_SIZE);
        let fields = split_fields(header_text(header)?, 2)?;
        if fields[1].is_empty() {
            return Err(PayloadError::EmptyField { index: 1 });
        }
        Ok((
            Self {
                parent: fields[0].to_string(),
                filename: fields[1].to_string(),
            },
            data,
        ))
    }
}

/// Download header: 128 bytes of `filename,size`, NUL-padded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadHeader {
    pub filename: String,
    pub size: u64,
}

impl DownloadHeader {
    /// Build the `DownloadSuccess` payload for `data`
    ///
    /// # Errors
    ///
    /// Returns `PayloadError::HeaderTooLong` if the filename is too long for
    /// the fixed header.
    pub fn encode(filename: &str, data: &[u8]) -> Result<Vec<u8>, PayloadError> {
        let text = format!("{filename}{SIZE_SEPARATOR}{}", data.len());
        encode_with_header(&text, DOWNLOAD_HEADER_SIZE, data)
    }

    /// Split a `DownloadSuccess` payload into its header and the file bytes
    ///
    /// The size is taken after the last comma, so file names may themselves
    /// contain commas.
    pub fn decode(payload: &[u8]) -> Result<(Self, &[u8]), PayloadError> {
        if payload.len() < DOWNLOAD_HEADER_SIZE {
            return Err(PayloadError::Truncated {
                needed: DOWNLOAD_HEADER_SIZE,
                available: payload.len(),
            });
        }
        let (header, data) = payload.split_at(DOWNLOAD_HEADER_SIZE);
        let text = header_text(header)?;
        let Some((filename, size)) = text.rsplit_once(SIZE_SEPARATOR) else {
            return Err(PayloadError::InvalidSize(text.to_string()));
        };
        let size: u64 = size
            .parse()
            .map_err(|_| PayloadError::InvalidSize(size.to_string()))?;
        if size != data.len() as u64 {
            return Err(PayloadError::SizeMismatch {
                declared: size,
                actual: data.len() as u64,
            });
        }
        Ok((
            Self {
                filename: filename.to_string(),
                size,
            },
            data,
        ))
    }
}
