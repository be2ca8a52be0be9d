//! Accept loop and the state shared by every connection

use std::io;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{debug, error, warn};

use crate::connection::{ConnectionParams, handle_connection};
use crate::db::Database;
use crate::sessions::SessionRegistry;
use crate::storage::StorageArea;

/// Shared server state; every field is cheap to clone per connection
#[derive(Clone)]
pub struct ServerState {
    pub sessions: SessionRegistry,
    pub db: Database,
    pub storage: StorageArea,
    pub max_frame_length: u32,
}

impl ServerState {
    pub fn new(db: Database, storage: StorageArea, max_frame_length: u32) -> Self {
        Self {
            sessions: SessionRegistry::new(),
            db,
            storage,
            max_frame_length,
        }
    }

    fn connection_params(&self, peer_addr: SocketAddr) -> ConnectionParams {
        ConnectionParams {
            peer_addr,
            sessions: self.sessions.clone(),
            db: self.db.clone(),
            storage: self.storage.clone(),
            max_frame_length: self.max_frame_length,
        }
    }
}

/// Accept connections forever, one task per connection
///
/// Accept errors are logged and the loop keeps going; only the caller can
/// stop it (by dropping the future).
pub async fn serve(listener: TcpListener, state: ServerState) {
    loop {
        match listener.accept().await {
            Ok((socket, peer_addr)) => {
                let params = state.connection_params(peer_addr);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(socket, params).await {
                        log_connection_error(&e, peer_addr);
                    }
                });
            }
            Err(e) => {
                error!(error = %e, "failed to accept connection");
            }
        }
    }
}

/// Log a connection that ended with an error
///
/// Peers that vanish without closing cleanly are routine and only show up
/// in debug output.
fn log_connection_error(error: &io::Error, peer_addr: SocketAddr) {
    match error.kind() {
        io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe => {
            debug!(peer = %peer_addr, error = %error, "connection dropped");
        }
        _ => warn!(peer = %peer_addr, error = %error, "connection error"),
    }
}
