//! Delete request handler

use std::fs;
use std::io;

use stash_common::protocol::PathRequest;
use tracing::{debug, warn};

use super::{
    HandlerContext, HandlerError, err_delete_file, err_delete_folder, err_delete_root,
    err_generic,
};
use crate::storage::{PathError, resolve_entry, user_relative};

/// Handle `{"path"}`: remove a file, or a folder and everything in it
///
/// Deleting something that does not exist succeeds and returns the
/// unchanged tree. The user's root itself cannot be deleted.
pub fn handle_delete(
    payload: &[u8],
    username: &str,
    ctx: &HandlerContext<'_>,
) -> Result<Vec<u8>, HandlerError> {
    let request = PathRequest::parse(payload)?;
    let segments = user_relative(username, &request.path)?;
    if segments.is_empty() {
        return Err(err_delete_root());
    }

    let user_root = ctx.user_root(username)?;
    let target = match resolve_entry(&user_root, &segments) {
        Ok(target) => Some(target),
        Err(PathError::NotFound) => None,
        Err(e) => return Err(e.into()),
    };

    if let Some(target) = target {
        match fs::symlink_metadata(&target) {
            Ok(metadata) if metadata.is_dir() => {
                remove(fs::remove_dir_all(&target)).map_err(|e| {
                    warn!(path = %target.display(), error = %e, "failed to delete folder");
                    err_delete_folder()
                })?;
            }
            Ok(_) => {
                remove(fs::remove_file(&target)).map_err(|e| {
                    warn!(path = %target.display(), error = %e, "failed to delete file");
                    err_delete_file()
                })?;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(user = username, path = %request.path, "nothing to delete");
            }
            Err(e) => {
                warn!(path = %target.display(), error = %e, "failed to inspect delete target");
                return Err(err_generic());
            }
        }
    }

    ctx.tree_payload(username)
}

/// Treat a target that vanished mid-delete as deleted
fn remove(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
