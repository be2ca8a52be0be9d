//! Shared test utilities for handler tests

use std::net::SocketAddr;

use tempfile::TempDir;

use stash_common::framing::RawFrame;
use stash_common::protocol::{Credentials, Request, Response, StorageNode};

use super::{HandlerContext, dispatch};
use crate::db::{Database, init_db};
use crate::sessions::SessionRegistry;
use crate::storage::StorageArea;

/// Test context that owns all resources needed for handler testing
pub struct TestContext {
    pub session_id: u32,
    pub peer_addr: SocketAddr,
    pub sessions: SessionRegistry,
    pub db: Database,
    pub storage: StorageArea,
    /// Keeps the storage root and database file alive
    pub temp_dir: TempDir,
}

impl TestContext {
    /// Create a HandlerContext from this TestContext
    pub fn handler_context(&self) -> HandlerContext<'_> {
        self.handler_context_for(self.session_id)
    }

    /// HandlerContext for another session sharing the same server state
    pub fn handler_context_for(&self, session_id: u32) -> HandlerContext<'_> {
        HandlerContext {
            session_id,
            peer_addr: self.peer_addr,
            sessions: &self.sessions,
            db: &self.db,
            storage: &self.storage,
        }
    }

    /// Register another connection and return its session ID
    pub async fn connect(&self) -> u32 {
        self.sessions.register(self.peer_addr).await
    }

    /// Path of a file or folder in `username`'s tree on disk
    pub fn disk_path(&self, username: &str, relative: &str) -> std::path::PathBuf {
        let mut path = self.storage.data_root().join(username);
        if !relative.is_empty() {
            path.push(relative);
        }
        path
    }
}

/// Helper to create a context with fresh storage, database, and one session
pub async fn create_test_context() -> TestContext {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let pool = init_db(&temp_dir.path().join("accounts.db"))
        .await
        .expect("Failed to create test database");
    let db = Database::new(pool).with_fast_hashing();
    let storage = StorageArea::init(temp_dir.path()).expect("Failed to create storage area");

    let peer_addr: SocketAddr = "127.0.0.1:40000".parse().unwrap();
    let sessions = SessionRegistry::new();
    let session_id = sessions.register(peer_addr).await;

    TestContext {
        session_id,
        peer_addr,
        sessions,
        db,
        storage,
        temp_dir,
    }
}

/// Dispatch a request on the context's own session
pub async fn send(test_ctx: &TestContext, request: Request, payload: &[u8]) -> RawFrame {
    send_as(test_ctx, test_ctx.session_id, request, payload).await
}

/// Dispatch a request on a specific session
pub async fn send_as(
    test_ctx: &TestContext,
    session_id: u32,
    request: Request,
    payload: &[u8],
) -> RawFrame {
    let frame = RawFrame::new(request.opcode(), payload.to_vec());
    dispatch(frame, &test_ctx.handler_context_for(session_id))
        .await
        .expect("request should be answered")
}

/// Create an account and sign the context's session in as it
pub async fn sign_up_and_in(test_ctx: &TestContext, username: &str, password: &str) {
    let credentials = Credentials {
        username: username.to_string(),
        password: password.to_string(),
    }
    .encode();

    let reply = send(test_ctx, Request::SignUp, &credentials).await;
    assert_eq!(reply.opcode, Response::SignUpSuccess.opcode(), "sign-up failed");
    let reply = send(test_ctx, Request::SignIn, &credentials).await;
    assert_eq!(reply.opcode, Response::SignInSuccess.opcode(), "sign-in failed");
}

/// Parse a tree-carrying success reply
pub fn reply_tree(reply: &RawFrame) -> StorageNode {
    StorageNode::from_json(&reply.payload).expect("reply should carry a tree")
}

/// Reply payload as text
pub fn reply_text(reply: &RawFrame) -> String {
    String::from_utf8_lossy(&reply.payload).into_owned()
}
