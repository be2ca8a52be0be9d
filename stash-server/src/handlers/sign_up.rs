//! SignUp request handler

use stash_common::protocol::Credentials;
use stash_common::validators;
use tracing::{error, info};

use super::{
    HandlerContext, HandlerError, err_account_exists, err_create_folder, err_generic,
    err_invalid_password, err_invalid_username,
};
use crate::constants::MSG_SIGN_UP_SUCCESS;
use crate::db::AccountError;

/// Handle `user;pass`: create an account with an empty storage tree
///
/// Does not sign the session in. Any directory already named after the new
/// account is wiped.
pub async fn handle_sign_up(
    payload: &[u8],
    ctx: &HandlerContext<'_>,
) -> Result<Vec<u8>, HandlerError> {
    let credentials = Credentials::parse(payload)?;
    let username = credentials.username.as_str();

    validators::validate_username(username).map_err(|_| err_invalid_username())?;
    validators::validate_password(&credentials.password).map_err(|_| err_invalid_password())?;

    match ctx
        .db
        .accounts
        .create_account(username, &credentials.password)
        .await
    {
        Ok(_) => {}
        Err(AccountError::AlreadyExists(_)) => return Err(err_account_exists(username)),
        Err(e) => {
            error!(
                peer = %ctx.peer_addr,
                user = username,
                error = %e,
                "failed to create account"
            );
            return Err(err_generic());
        }
    }

    // An account without its empty tree is never left behind
    if let Err(e) = ctx.storage.reset_user_root(username) {
        error!(user = username, error = %e, "failed to create user root");
        if let Err(e) = ctx.db.accounts.delete_account(username).await {
            error!(user = username, error = %e, "failed to undo account creation");
        }
        return Err(err_create_folder());
    }

    info!(peer = %ctx.peer_addr, user = username, "account created");
    Ok(MSG_SIGN_UP_SUCCESS.as_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use stash_common::protocol::{Request, Response};

    #[tokio::test]
    async fn test_sign_up_creates_empty_root() {
        let test_ctx = create_test_context().await;
        let reply = send(&test_ctx, Request::SignUp, b"alice;pw").await;

        assert_eq!(reply.opcode, Response::SignUpSuccess.opcode());
        assert_eq!(reply_text(&reply), "SignUp success");
        assert!(test_ctx.db.accounts.account_exists("alice").await.unwrap());
        assert!(test_ctx.disk_path("alice", "").is_dir());
        // Sign-up alone does not sign in
        assert_eq!(test_ctx.sessions.username_of(test_ctx.session_id).await, None);
    }

    #[tokio::test]
    async fn test_sign_up_wipes_leftover_directory() {
        let test_ctx = create_test_context().await;
        let root = test_ctx.disk_path("alice", "");
        std::fs::create_dir_all(root.join("old")).unwrap();
        std::fs::write(root.join("stale.txt"), b"x").unwrap();

        send(&test_ctx, Request::SignUp, b"alice;pw").await;
        assert!(std::fs::read_dir(&root).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_any_case() {
        let test_ctx = create_test_context().await;
        send(&test_ctx, Request::SignUp, b"alice;pw").await;
        std::fs::write(test_ctx.disk_path("alice", "keep.txt"), b"data").unwrap();

        let reply = send(&test_ctx, Request::SignUp, b"ALICE;other").await;
        assert_eq!(reply.opcode, Response::SignUpError.opcode());
        assert_eq!(reply_text(&reply), "ALICE already exists");
        // The existing tree is untouched
        assert!(test_ctx.disk_path("alice", "keep.txt").exists());
    }

    #[tokio::test]
    async fn test_duplicate_non_ascii_case() {
        let test_ctx = create_test_context().await;
        let reply = send(&test_ctx, Request::SignUp, "Émile;pw".as_bytes()).await;
        assert_eq!(reply.opcode, Response::SignUpSuccess.opcode());

        let reply = send(&test_ctx, Request::SignUp, "émile;pw".as_bytes()).await;
        assert_eq!(reply.opcode, Response::SignUpError.opcode());
        assert_eq!(reply_text(&reply), "émile already exists");

        // Either spelling signs in to the one account
        let reply = send(&test_ctx, Request::SignIn, "émile;pw".as_bytes()).await;
        assert_eq!(reply.opcode, Response::SignInSuccess.opcode());
        assert_eq!(
            test_ctx.sessions.username_of(test_ctx.session_id).await.as_deref(),
            Some("Émile")
        );
    }

    #[tokio::test]
    async fn test_unusable_root_fails_and_keeps_name_free() {
        let test_ctx = create_test_context().await;
        // A plain file where the user's directory should go
        let blocker = test_ctx.disk_path("bob", "");
        std::fs::write(&blocker, b"stale").unwrap();

        let reply = send(&test_ctx, Request::SignUp, b"bob;pw").await;
        assert_eq!(reply.opcode, Response::SignUpError.opcode());
        assert_eq!(reply_text(&reply), "Cannot create folder");
        assert!(!test_ctx.db.accounts.account_exists("bob").await.unwrap());

        let reply = send(&test_ctx, Request::SignIn, b"bob;pw").await;
        assert_eq!(reply.opcode, Response::SignInError.opcode());
        assert_eq!(reply_text(&reply), "bob doesn't exist");

        // Once the blocker is gone the name can be taken
        std::fs::remove_file(&blocker).unwrap();
        let reply = send(&test_ctx, Request::SignUp, b"bob;pw").await;
        assert_eq!(reply.opcode, Response::SignUpSuccess.opcode());
        assert!(test_ctx.disk_path("bob", "").is_dir());
    }

    #[tokio::test]
    async fn test_rejects_path_sensitive_usernames() {
        let test_ctx = create_test_context().await;
        let payloads: [&[u8]; 4] = [b"../evil;pw", b"a/b;pw", b"a b;pw", b"trash\\x;pw"];
        for payload in payloads {
            let reply = send(&test_ctx, Request::SignUp, payload).await;
            assert_eq!(reply.opcode, Response::SignUpError.opcode());
            assert_eq!(reply_text(&reply), "Invalid username");
        }
        for name in ["../evil", "a/b", "a b", "trash\\x"] {
            assert!(!test_ctx.db.accounts.account_exists(name).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_rejects_empty_password() {
        let test_ctx = create_test_context().await;
        let reply = send(&test_ctx, Request::SignUp, b"alice;").await;
        assert_eq!(reply.opcode, Response::SignUpError.opcode());
        assert_eq!(reply_text(&reply), "Invalid password");
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let test_ctx = create_test_context().await;
        let reply = send(&test_ctx, Request::SignUp, b"alice").await;
        assert_eq!(reply.opcode, Response::SignUpError.opcode());
        assert_eq!(reply_text(&reply), "Invalid data");
    }
}
