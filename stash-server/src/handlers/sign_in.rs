//! SignIn request handler

use stash_common::protocol::Credentials;
use stash_common::validators;
use tracing::{error, warn};

use super::{
    HandlerContext, HandlerError, err_already_signed_in, err_generic, err_invalid_data,
    err_password_incorrect, err_unknown_user,
};
use crate::constants::MSG_SIGN_IN_SUCCESS;
use crate::db::Verification;
use crate::sessions::SignInError;

/// Handle `user;pass`: verify the account and bind it to this session
///
/// The session is bound to the account's canonical spelling, whatever case
/// the client typed.
pub async fn handle_sign_in(
    payload: &[u8],
    ctx: &HandlerContext<'_>,
) -> Result<Vec<u8>, HandlerError> {
    let credentials = Credentials::parse(payload)?;
    if credentials.password.is_empty()
        || validators::validate_password_input(&credentials.password).is_err()
    {
        return Err(err_invalid_data());
    }
    let typed = credentials.username.as_str();

    let username = match ctx.db.accounts.verify(typed, &credentials.password).await {
        Ok(Verification::Verified(username)) => username,
        Ok(Verification::UnknownUser) => return Err(err_unknown_user(typed)),
        Ok(Verification::WrongPassword) => {
            warn!(peer = %ctx.peer_addr, user = typed, "wrong password");
            return Err(err_password_incorrect());
        }
        Err(e) => {
            error!(peer = %ctx.peer_addr, user = typed, error = %e, "account lookup failed");
            return Err(err_generic());
        }
    };

    match ctx.sessions.sign_in(ctx.session_id, &username).await {
        Ok(()) => {}
        Err(SignInError::AlreadySignedIn(_)) => return Err(err_already_signed_in(typed)),
        Err(SignInError::UnknownSession(_)) => return Err(err_generic()),
    }

    // A tree removed out of band comes back empty
    if let Err(e) = ctx.storage.ensure_user_root(&username) {
        error!(user = %username, error = %e, "failed to create user root");
        if let Err(e) = ctx.sessions.sign_out(ctx.session_id).await {
            warn!(user = %username, error = %e, "failed to undo sign-in");
        }
        return Err(err_generic());
    }

    Ok(MSG_SIGN_IN_SUCCESS.as_bytes().to_vec())
}
