//! RenameFolder and RenameFile request handler

use stash_common::protocol::Request;

use super::{HandlerError, err_rename_unsupported};

/// Renaming is reserved in the protocol but not offered; always an error
/// reply on the request's own error opcode
pub fn handle_rename(request: Request) -> Result<Vec<u8>, HandlerError> {
    debug_assert!(matches!(request, Request::RenameFolder | Request::RenameFile));
    Err(err_rename_unsupported())
}
