//! GetData request handler

use super::{HandlerContext, HandlerError};

/// Handle a tree request: snapshot the caller's whole tree
pub fn handle_get_data(username: &str, ctx: &HandlerContext<'_>) -> Result<Vec<u8>, HandlerError> {
    ctx.user_root(username)?;
    ctx.tree_payload(username)
}
