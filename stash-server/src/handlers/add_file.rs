//! AddFile request handler

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use stash_common::DOWNLOAD_HEADER_SIZE;
use stash_common::protocol::UploadHeader;
use stash_common::validators;
use tracing::{debug, warn};

use super::{HandlerContext, HandlerError, err_invalid_filename, err_write_file};
use crate::storage::{WriteError, write_file_safely};

/// Longest name that still fits a download header next to any `u64` size
const MAX_STORED_NAME_LENGTH: usize = DOWNLOAD_HEADER_SIZE - 1 - 20;

/// Handle an upload: 256-byte `parent;filename` header, then the file bytes
///
/// An existing file is replaced. If the write fails the previous content is
/// put back, so the file is either fully old or fully new.
pub fn handle_add_file(
    payload: &[u8],
    username: &str,
    ctx: &HandlerContext<'_>,
) -> Result<Vec<u8>, HandlerError> {
    let (header, data) = UploadHeader::decode(payload)?;
    if validators::validate_file_name(&header.filename).is_err()
        || header.filename.len() > MAX_STORED_NAME_LENGTH
    {
        return Err(err_invalid_filename());
    }

    let parent = ctx.parent_dir(username, &header.parent)?;
    let target = parent.join(&header.filename);

    store_upload(&target, username, ctx, |file| file.write_all(data))?;
    debug!(
        user = username,
        path = %target.display(),
        size = data.len(),
        "file stored"
    );

    ctx.tree_payload(username)
}

/// Write `target` through the overwrite-safe writer and map its failures
fn store_upload<F>(
    target: &Path,
    username: &str,
    ctx: &HandlerContext<'_>,
    fill: F,
) -> Result<(), HandlerError>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    match write_file_safely(target, ctx.storage.trash_root(), fill) {
        Ok(()) => Ok(()),
        Err(WriteError::IsDirectory(_)) => Err(err_invalid_filename()),
        Err(e) => {
            warn!(
                user = username,
                path = %target.display(),
                error = %e,
                "failed to store file"
            );
            Err(err_write_file())
        }
    }
}
