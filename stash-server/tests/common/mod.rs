//! Shared helpers for end-to-end tests

use std::net::SocketAddr;
use std::path::PathBuf;

use stash_common::client::Client;
use stash_server::db::{Database, init_db};
use stash_server::server::{ServerState, serve};
use stash_server::storage::StorageArea;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Frame limit for test servers
pub const TEST_MAX_FRAME_LENGTH: u32 = 1024 * 1024;

/// A server listening on an ephemeral local port
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: ServerState,
    pub temp_dir: TempDir,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Open a new client connection
    pub async fn connect(&self) -> Client {
        Client::connect(self.addr)
            .await
            .expect("Failed to connect to test server")
    }

    /// Open a connection already signed in as a fresh account
    pub async fn signed_in(&self, username: &str, password: &str) -> Client {
        let mut client = self.connect().await;
        client.sign_up(username, password).await.expect("sign-up failed");
        client.sign_in(username, password).await.expect("sign-in failed");
        client
    }

    /// Holding area directory
    pub fn trash_dir(&self) -> PathBuf {
        self.state.storage.trash_root().to_path_buf()
    }

    /// On-disk location of a file in `username`'s tree
    pub fn disk_path(&self, username: &str, relative: &str) -> PathBuf {
        self.state.storage.data_root().join(username).join(relative)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start a server over a temporary storage root
pub async fn start_server() -> TestServer {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let pool = init_db(&temp_dir.path().join("accounts.db"))
        .await
        .expect("Failed to create test database");
    let db = Database::new(pool).with_fast_hashing();
    let storage = StorageArea::init(temp_dir.path()).expect("Failed to create storage area");
    let state = ServerState::new(db, storage, TEST_MAX_FRAME_LENGTH);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");
    let task = tokio::spawn(serve(listener, state.clone()));

    TestServer {
        addr,
        state,
        temp_dir,
        task,
    }
}
