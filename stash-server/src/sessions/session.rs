//! Per-connection session record

use std::net::SocketAddr;

use chrono::{DateTime, Utc};

/// State of one connection
///
/// Anonymous until sign-in binds a username; sign-out returns it to
/// anonymous. The record lives exactly as long as the connection.
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID (unique per connection for the life of the process)
    pub session_id: u32,
    /// Remote address of the connection
    pub peer_addr: SocketAddr,
    /// Canonical username bound by sign-in, `None` while anonymous
    pub username: Option<String>,
    /// When the current username was bound
    pub signed_in_at: Option<DateTime<Utc>>,
    /// When the connection was accepted
    pub connected_at: DateTime<Utc>,
}

impl Session {
    pub(super) fn new(session_id: u32, peer_addr: SocketAddr) -> Self {
        Self {
            session_id,
            peer_addr,
            username: None,
            signed_in_at: None,
            connected_at: Utc::now(),
        }
    }
}
