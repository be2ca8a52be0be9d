//! SignOut request handler

use tracing::debug;

use super::{HandlerContext, HandlerError, err_generic};
use crate::constants::MSG_SIGN_OUT_SUCCESS;

/// Handle a sign-out: clear this session's username
///
/// The payload is ignored; only the session matters. Signing out an
/// anonymous session succeeds.
pub async fn handle_sign_out(ctx: &HandlerContext<'_>) -> Result<Vec<u8>, HandlerError> {
    let previous = ctx
        .sessions
        .sign_out(ctx.session_id)
        .await
        .map_err(|_| err_generic())?;

    if let Some(username) = previous {
        debug!(peer = %ctx.peer_addr, user = %username, "signed out");
    }
    Ok(MSG_SIGN_OUT_SUCCESS.as_bytes().to_vec())
}
