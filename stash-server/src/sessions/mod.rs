//! Session registry for tracking connections and who is signed in
//!
//! All sessions live behind one registry-wide lock. Sign-in checks that the
//! username is not bound anywhere else and binds it while holding the write
//! guard, so two connections racing to sign in as the same user cannot both
//! succeed.

mod mutations;
mod queries;
mod session;

pub use mutations::{SignInError, UnknownSession};
pub use session::Session;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::RwLock;

/// Tracks every live connection and its signed-in username
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    pub(super) sessions: Arc<RwLock<HashMap<u32, Session>>>,
    pub(super) next_id: Arc<AtomicU32>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU32::new(1)),
        }
    }

    /// Generate the next session ID
    pub(super) fn next_session_id(&self) -> u32 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
