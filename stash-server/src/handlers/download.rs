//! Download request handler

use std::fs;

use stash_common::protocol::{DownloadHeader, PathRequest};
use tracing::warn;

use super::{HandlerContext, HandlerError, err_invalid_data, err_invalid_filename, err_open_file};
use crate::storage::{resolve_existing, user_relative};

/// Handle `{"path"}`: reply with a 128-byte `filename,size` header and the
/// file's bytes
pub fn handle_download(
    payload: &[u8],
    username: &str,
    ctx: &HandlerContext<'_>,
) -> Result<Vec<u8>, HandlerError> {
    let request = PathRequest::parse(payload)?;
    let segments = user_relative(username, &request.path)?;
    let Some(filename) = segments.last().copied() else {
        return Err(err_invalid_data());
    };

    let user_root = ctx.user_root(username)?;
    let path = resolve_existing(&user_root, &segments).map_err(|_| err_invalid_data())?;
    if !path.is_file() {
        return Err(err_invalid_data());
    }

    let data = fs::read(&path).map_err(|e| {
        warn!(user = username, path = %path.display(), error = %e, "failed to read file");
        err_open_file()
    })?;

    DownloadHeader::encode(filename, &data).map_err(|_| err_invalid_filename())
}
