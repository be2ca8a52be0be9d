//! AddFolder request handler

use std::fs;
use std::io;

use stash_common::protocol::FolderRequest;
use stash_common::validators;
use tracing::warn;

use super::{
    HandlerContext, HandlerError, err_create_folder, err_folder_exists, err_invalid_data,
};

/// Handle `parent;name`: create one folder inside an existing folder
pub fn handle_add_folder(
    payload: &[u8],
    username: &str,
    ctx: &HandlerContext<'_>,
) -> Result<Vec<u8>, HandlerError> {
    let request = FolderRequest::parse(payload)?;
    validators::validate_file_name(&request.name).map_err(|_| err_invalid_data())?;

    let parent = ctx.parent_dir(username, &request.parent)?;
    let target = parent.join(&request.name);

    match fs::create_dir(&target) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            // A file of the same name is not "a folder that exists"
            return Err(if target.is_dir() {
                err_folder_exists()
            } else {
                err_create_folder()
            });
        }
        Err(e) => {
            warn!(path = %target.display(), error = %e, "failed to create folder");
            return Err(err_create_folder());
        }
    }

    ctx.tree_payload(username)
}
