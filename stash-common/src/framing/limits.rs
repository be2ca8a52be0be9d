//! Per-request payload limits
//!
//! The server checks these as soon as a frame's header has arrived, before
//! the payload is buffered, so an oversized sign-in or path request is
//! rejected without reading it. Responses are not limited here; the client
//! trusts the server and only the global frame maximum applies.

use crate::protocol::Request;
use crate::validators::{
    MAX_FILE_NAME_LENGTH, MAX_FILE_PATH_LENGTH, MAX_PASSWORD_LENGTH, MAX_USERNAME_LENGTH,
};

/// Worst-case UTF-8 width of a character
const MAX_UTF8_CHAR_BYTES: usize = 4;

/// `{"path":""}`
const PATH_JSON_OVERHEAD: usize = 11;

/// Apply 20% padding to a limit for safety margin
const fn pad_limit(base: u64) -> u64 {
    (base * 6) / 5
}

const fn credentials_limit() -> u64 {
    // "<username>;<password>"
    (MAX_USERNAME_LENGTH * MAX_UTF8_CHAR_BYTES + 1 + MAX_PASSWORD_LENGTH) as u64
}

const fn path_json_limit() -> u64 {
    // Quotes and backslashes double when JSON-escaped
    (PATH_JSON_OVERHEAD + MAX_FILE_PATH_LENGTH * 2) as u64
}

const fn folder_limit() -> u64 {
    // "<parent>;<name>"
    (MAX_FILE_PATH_LENGTH + 1 + MAX_FILE_NAME_LENGTH) as u64
}

/// Maximum payload size for a request opcode
///
/// A limit of `0` means "unlimited": only the frame reader's global maximum
/// applies. Uploads and unknown opcodes fall in this category (unknown
/// opcodes are answered with a generic error by the server, not rejected at
/// the framing layer).
pub fn max_payload_for_request(opcode: u32) -> u64 {
    let Some(request) = Request::from_repr(opcode) else {
        return 0;
    };

    match request {
        Request::None => 1024,
        Request::SignIn | Request::SignUp => pad_limit(credentials_limit()),
        Request::SignOut => pad_limit((MAX_USERNAME_LENGTH * MAX_UTF8_CHAR_BYTES) as u64),
        Request::GetData => 64,
        Request::Delete | Request::Download => pad_limit(path_json_limit()),
        Request::AddFolder => pad_limit(folder_limit()),
        Request::RenameFolder | Request::RenameFile => pad_limit(folder_limit()),
        Request::AddFile => 0,
    }
}
