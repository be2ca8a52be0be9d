//! Mutation methods for SessionRegistry

use std::net::SocketAddr;

use chrono::Utc;
use stash_common::validators::username_key;
use thiserror::Error;

use super::SessionRegistry;
use super::session::Session;

/// The session ID has no record (the connection is already gone)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown session {0}")]
pub struct UnknownSession(pub u32);

/// Error returned when binding a username fails
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignInError {
    /// The username is already bound to a live session (possibly this one)
    #[error("{0} already signed in")]
    AlreadySignedIn(String),
    /// The session ID has no record
    #[error(transparent)]
    UnknownSession(#[from] UnknownSession),
}

impl SessionRegistry {
    /// Register a new anonymous session and return its ID
    pub async fn register(&self, peer_addr: SocketAddr) -> u32 {
        let session_id = self.next_session_id();
        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id, Session::new(session_id, peer_addr));
        session_id
    }

    /// Bind `username` to a session
    ///
    /// The duplicate check is case-insensitive and covers every live session,
    /// including this one: a session that is already signed in must sign out
    /// before signing in again.
    ///
    /// # Errors
    ///
    /// Returns `SignInError::AlreadySignedIn` if any session carries the
    /// username, or `SignInError::UnknownSession` if `session_id` is gone.
    pub async fn sign_in(&self, session_id: u32, username: &str) -> Result<(), SignInError> {
        // Check and bind under the same write guard
        let mut sessions = self.sessions.write().await;

        let key = username_key(username);
        let taken = sessions.values().any(|session| {
            session
                .username
                .as_deref()
                .is_some_and(|bound| username_key(bound) == key)
        });
        if taken {
            return Err(SignInError::AlreadySignedIn(username.to_string()));
        }

        let session = sessions
            .get_mut(&session_id)
            .ok_or(UnknownSession(session_id))?;
        session.username = Some(username.to_string());
        session.signed_in_at = Some(Utc::now());
        Ok(())
    }

    /// Clear a session's username
    ///
    /// Returns the username that was bound, if any. Signing out an anonymous
    /// session is not an error.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSession` if `session_id` has no record.
    pub async fn sign_out(&self, session_id: u32) -> Result<Option<String>, UnknownSession> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or(UnknownSession(session_id))?;
        session.signed_in_at = None;
        Ok(session.username.take())
    }

    /// Remove a session when its connection closes
    pub async fn remove(&self, session_id: u32) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&session_id)
    }
}
