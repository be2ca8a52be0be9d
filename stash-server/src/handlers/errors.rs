//! Handler error type and the messages sent back in error replies
//!
//! Constructor functions are organized by category for easy lookup.

use stash_common::protocol::PayloadError;
use thiserror::Error;

use crate::constants::{
    ERR_CREATE_FOLDER, ERR_DELETE_FILE, ERR_DELETE_FOLDER, ERR_DELETE_ROOT, ERR_FOLDER_EXISTS,
    ERR_FOLDER_NOT_FOUND, ERR_GENERIC, ERR_INVALID_DATA, ERR_INVALID_FILENAME,
    ERR_INVALID_PASSWORD, ERR_INVALID_USERNAME, ERR_NOT_SIGNED_IN, ERR_OPEN_FILE,
    ERR_PASSWORD_INCORRECT, ERR_RENAME_UNSUPPORTED, ERR_WRITE_FILE,
};
use crate::storage::PathError;

/// A failed request; the message becomes the error reply's payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// Unknown user, wrong password, already signed in, or not signed in
    #[error("{0}")]
    Auth(String),
    /// Malformed payload, path outside the caller's root, or a missing target
    #[error("{0}")]
    Validation(String),
    /// The filesystem refused a create, delete, read or write
    #[error("{0}")]
    FileSystem(String),
}

impl HandlerError {
    /// Message carried in the error reply
    pub fn message(&self) -> &str {
        match self {
            HandlerError::Auth(msg)
            | HandlerError::Validation(msg)
            | HandlerError::FileSystem(msg) => msg,
        }
    }
}

impl From<PayloadError> for HandlerError {
    fn from(_: PayloadError) -> Self {
        err_invalid_data()
    }
}

impl From<PathError> for HandlerError {
    fn from(e: PathError) -> Self {
        match e {
            PathError::InvalidPath
            | PathError::NotOwner
            | PathError::AccessDenied
            | PathError::NotFound => err_invalid_data(),
            PathError::CanonicalizeFailed(_) => err_generic(),
        }
    }
}

// ========================================================================
// Authentication Errors
// ========================================================================

/// "<username> doesn't exist"
pub fn err_unknown_user(username: &str) -> HandlerError {
    HandlerError::Auth(format!("{username} doesn't exist"))
}

pub fn err_password_incorrect() -> HandlerError {
    HandlerError::Auth(ERR_PASSWORD_INCORRECT.to_string())
}

/// "<username> already signed in"
pub fn err_already_signed_in(username: &str) -> HandlerError {
    HandlerError::Auth(format!("{username} already signed in"))
}

/// "<username> already exists"
pub fn err_account_exists(username: &str) -> HandlerError {
    HandlerError::Auth(format!("{username} already exists"))
}

pub fn err_not_signed_in() -> HandlerError {
    HandlerError::Auth(ERR_NOT_SIGNED_IN.to_string())
}

// ========================================================================
// Validation Errors
// ========================================================================

pub fn err_invalid_data() -> HandlerError {
    HandlerError::Validation(ERR_INVALID_DATA.to_string())
}

pub fn err_invalid_username() -> HandlerError {
    HandlerError::Validation(ERR_INVALID_USERNAME.to_string())
}

pub fn err_invalid_password() -> HandlerError {
    HandlerError::Validation(ERR_INVALID_PASSWORD.to_string())
}

pub fn err_invalid_filename() -> HandlerError {
    HandlerError::Validation(ERR_INVALID_FILENAME.to_string())
}

pub fn err_folder_not_found() -> HandlerError {
    HandlerError::Validation(ERR_FOLDER_NOT_FOUND.to_string())
}

pub fn err_folder_exists() -> HandlerError {
    HandlerError::Validation(ERR_FOLDER_EXISTS.to_string())
}

pub fn err_delete_root() -> HandlerError {
    HandlerError::Validation(ERR_DELETE_ROOT.to_string())
}

pub fn err_rename_unsupported() -> HandlerError {
    HandlerError::Validation(ERR_RENAME_UNSUPPORTED.to_string())
}

// ========================================================================
// File System Errors
// ========================================================================

pub fn err_create_folder() -> HandlerError {
    HandlerError::FileSystem(ERR_CREATE_FOLDER.to_string())
}

pub fn err_delete_file() -> HandlerError {
    HandlerError::FileSystem(ERR_DELETE_FILE.to_string())
}

pub fn err_delete_folder() -> HandlerError {
    HandlerError::FileSystem(ERR_DELETE_FOLDER.to_string())
}

pub fn err_write_file() -> HandlerError {
    HandlerError::FileSystem(ERR_WRITE_FILE.to_string())
}

pub fn err_open_file() -> HandlerError {
    HandlerError::FileSystem(ERR_OPEN_FILE.to_string())
}

/// Catch-all for internal failures the client cannot act on
pub fn err_generic() -> HandlerError {
    HandlerError::FileSystem(ERR_GENERIC.to_string())
}
