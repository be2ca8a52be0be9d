//! Request handlers and the dispatcher that routes frames to them
//!
//! Each request produces at most one reply frame: the request's success
//! opcode with the handler's payload, or its error opcode with the
//! handler's message.

mod add_file;
mod add_folder;
mod delete;
mod download;
pub mod errors;
mod get_data;
mod rename;
mod sign_in;
mod sign_out;
mod sign_up;

#[cfg(test)]
pub mod testing;

pub use add_file::handle_add_file;
pub use add_folder::handle_add_folder;
pub use delete::handle_delete;
pub use download::handle_download;
pub use errors::*;
pub use get_data::handle_get_data;
pub use rename::handle_rename;
pub use sign_in::handle_sign_in;
pub use sign_out::handle_sign_out;
pub use sign_up::handle_sign_up;

use std::net::SocketAddr;
use std::path::PathBuf;

use stash_common::framing::RawFrame;
use stash_common::protocol::{Request, Response};
use tracing::{debug, error, info, warn};

use crate::constants::ERR_UNKNOWN_REQUEST;
use crate::db::Database;
use crate::sessions::SessionRegistry;
use crate::storage::{PathError, StorageArea, parent_relative, resolve_existing};

/// Context passed to all handlers with shared resources
pub struct HandlerContext<'a> {
    pub session_id: u32,
    pub peer_addr: SocketAddr,
    pub sessions: &'a SessionRegistry,
    pub db: &'a Database,
    pub storage: &'a StorageArea,
}

impl HandlerContext<'_> {
    /// Username bound to this session
    ///
    /// # Errors
    ///
    /// Returns "Finish signing in to continue" for anonymous sessions.
    pub async fn require_authenticated(&self) -> Result<String, HandlerError> {
        self.sessions
            .username_of(self.session_id)
            .await
            .ok_or_else(err_not_signed_in)
    }

    /// Canonical root of `username`'s tree, recreated if it went missing
    pub fn user_root(&self, username: &str) -> Result<PathBuf, HandlerError> {
        self.storage.ensure_user_root(username).map_err(|e| {
            error!(user = username, error = %e, "failed to open user root");
            err_generic()
        })
    }

    /// Existing folder named by an `AddFolder`/`AddFile` parent field
    ///
    /// # Errors
    ///
    /// Returns "Invalid data" for malformed or foreign paths and "Folder does
    /// not exist" if the parent is missing or is a file.
    pub fn parent_dir(&self, username: &str, parent: &str) -> Result<PathBuf, HandlerError> {
        let segments = parent_relative(username, parent)?;
        let user_root = self.user_root(username)?;
        let dir = match resolve_existing(&user_root, &segments) {
            Ok(dir) => dir,
            Err(PathError::NotFound) => return Err(err_folder_not_found()),
            Err(e) => return Err(e.into()),
        };
        if !dir.is_dir() {
            return Err(err_folder_not_found());
        }
        Ok(dir)
    }

    /// Fresh snapshot of `username`'s tree as a reply payload
    pub fn tree_payload(&self, username: &str) -> Result<Vec<u8>, HandlerError> {
        let tree = self.storage.snapshot(username).map_err(|e| {
            error!(user = username, error = %e, "failed to build storage tree");
            err_generic()
        })?;
        tree.to_json().map_err(|e| {
            error!(user = username, error = %e, "failed to serialize storage tree");
            err_generic()
        })
    }
}

/// Route one request frame and build its reply
///
/// Returns `None` only for `Request::None`, which is logged and never
/// answered. Unknown opcodes get a generic `Error` reply.
pub async fn dispatch(frame: RawFrame, ctx: &HandlerContext<'_>) -> Option<RawFrame> {
    let Some(request) = Request::from_opcode(frame.opcode) else {
        warn!(
            peer = %ctx.peer_addr,
            session = ctx.session_id,
            opcode = frame.opcode,
            "unknown request"
        );
        return Some(RawFrame::new(
            Response::Error.opcode(),
            ERR_UNKNOWN_REQUEST.as_bytes().to_vec(),
        ));
    };

    if request == Request::None {
        debug!(peer = %ctx.peer_addr, session = ctx.session_id, "no-op request");
        return None;
    }

    let payload = frame.payload.as_slice();
    let result = if request.requires_auth() {
        match ctx.require_authenticated().await {
            Ok(username) => handle_authenticated(request, payload, &username, ctx),
            Err(e) => Err(e),
        }
    } else {
        match request {
            Request::SignIn => handle_sign_in(payload, ctx).await,
            Request::SignUp => handle_sign_up(payload, ctx).await,
            Request::SignOut => handle_sign_out(ctx).await,
            _ => Err(err_generic()),
        }
    };

    let reply = match result {
        Ok(payload) => {
            info!(
                peer = %ctx.peer_addr,
                session = ctx.session_id,
                request = request.as_ref(),
                "OK"
            );
            RawFrame::new(request.success_response().opcode(), payload)
        }
        Err(e) => {
            info!(
                peer = %ctx.peer_addr,
                session = ctx.session_id,
                request = request.as_ref(),
                error = %e,
                "request failed"
            );
            RawFrame::new(
                request.error_response().opcode(),
                e.message().as_bytes().to_vec(),
            )
        }
    };
    Some(reply)
}

fn handle_authenticated(
    request: Request,
    payload: &[u8],
    username: &str,
    ctx: &HandlerContext<'_>,
) -> Result<Vec<u8>, HandlerError> {
    match request {
        Request::GetData => handle_get_data(username, ctx),
        Request::Delete => handle_delete(payload, username, ctx),
        Request::AddFolder => handle_add_folder(payload, username, ctx),
        Request::AddFile => handle_add_file(payload, username, ctx),
        Request::Download => handle_download(payload, username, ctx),
        Request::RenameFolder | Request::RenameFile => handle_rename(request),
        Request::None | Request::SignIn | Request::SignUp | Request::SignOut => Err(err_generic()),
    }
}
