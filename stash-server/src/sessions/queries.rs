//! Query methods for SessionRegistry

use stash_common::validators::username_key;

use super::SessionRegistry;

impl SessionRegistry {
    /// Username bound to a session (`None` if anonymous or unknown)
    pub async fn username_of(&self, session_id: u32) -> Option<String> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&session_id)
            .and_then(|session| session.username.clone())
    }

    /// Whether any session is signed in as `username` (case-insensitive)
    pub async fn is_signed_in(&self, username: &str) -> bool {
        let sessions = self.sessions.read().await;
        let key = username_key(username);
        sessions.values().any(|session| {
            session
                .username
                .as_deref()
                .is_some_and(|bound| username_key(bound) == key)
        })
    }

    /// Number of live sessions (signed in or not)
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    fn addr() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[tokio::test]
    async fn test_is_signed_in() {
        let registry = SessionRegistry::new();
        let id = registry.register(addr()).await;

        assert!(!registry.is_signed_in("alice").await);
        registry.sign_in(id, "Alice").await.unwrap();
        assert!(registry.is_signed_in("alice").await);
        assert!(registry.is_signed_in("ALICE").await);
        assert!(!registry.is_signed_in("bob").await);
    }

    #[tokio::test]
    async fn test_counts() {
        let registry = SessionRegistry::new();
        let a = registry.register(addr()).await;
        registry.register(addr()).await;

        assert_eq!(registry.count().await, 2);

        // Signing in does not add a session
        registry.sign_in(a, "alice").await.unwrap();
        assert_eq!(registry.count().await, 2);
        registry.remove(a).await;
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_username_of_unknown() {
        let registry = SessionRegistry::new();
        assert_eq!(registry.username_of(7).await, None);
    }
}
