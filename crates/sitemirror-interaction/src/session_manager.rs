//! Session lifecycle over a [`SessionStore`].
//!
//! The store is the only shared mutable state in the client. Every request
//! reads the token once at dispatch; a logout that lands while a request is
//! in flight does not affect that request.

use sitemirror_core::Result;
use sitemirror_core::session::{AUTH_TOKEN_KEY, Session, SessionStore, USER_DATA_KEY, User};
use std::sync::Arc;

/// Reads, writes and clears the persisted token + user record.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Token to attach to the next request, if any.
    ///
    /// A storage read failure is logged and treated as "no token".
    pub async fn current_token(&self) -> Option<String> {
        match self.store.get_item(AUTH_TOKEN_KEY).await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("[Session] Failed to read token: {}", e);
                None
            }
        }
    }

    /// Optimistic restore: token and user record present means authenticated.
    ///
    /// Nothing is validated against the server; the first 401 tears the
    /// session down. A corrupt user record yields `None`.
    pub async fn restore(&self) -> Option<Session> {
        let token = self.current_token().await?;
        let user_data = match self.store.get_item(USER_DATA_KEY).await {
            Ok(Some(data)) => data,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("[Session] Failed to read user record: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<User>(&user_data) {
            Ok(user) => Some(Session::new(token, user)),
            Err(e) => {
                tracing::warn!("[Session] Stored user record is unreadable: {}", e);
                None
            }
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current_token().await.is_some()
    }

    /// Persists both entries; the user record is written as JSON text.
    pub async fn persist(&self, session: &Session) -> Result<()> {
        let user_data = serde_json::to_string(&session.user)?;
        self.store.set_item(AUTH_TOKEN_KEY, &session.token).await?;
        self.store.set_item(USER_DATA_KEY, &user_data).await?;
        tracing::info!("[Session] Session stored for {}", session.user.username);
        Ok(())
    }

    /// Clears both entries. Best-effort: failures are logged, not returned.
    pub async fn clear(&self) {
        match self.store.remove_items(&[AUTH_TOKEN_KEY, USER_DATA_KEY]).await {
            Ok(()) => tracing::info!("[Session] Session cleared"),
            Err(e) => tracing::warn!("[Session] Failed to clear session: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitemirror_core::session::Role;
    use sitemirror_infrastructure::MemorySessionStore;

    fn manager() -> (SessionManager, MemorySessionStore) {
        let store = MemorySessionStore::new();
        (SessionManager::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn test_restore_needs_both_entries() {
        let (manager, store) = manager();
        assert!(manager.restore().await.is_none());

        store.set_item(AUTH_TOKEN_KEY, "tok").await.unwrap();
        assert!(manager.restore().await.is_none());

        store
            .set_item(USER_DATA_KEY, r#"{"username":"alice","role":"admin"}"#)
            .await
            .unwrap();
        let session = manager.restore().await.unwrap();
        assert_eq!(session.token, "tok");
        assert_eq!(session.user, User::new("alice", Role::Admin));
    }

    #[tokio::test]
    async fn test_corrupt_user_record_is_not_a_session() {
        let (manager, store) = manager();
        store.set_item(AUTH_TOKEN_KEY, "tok").await.unwrap();
        store.set_item(USER_DATA_KEY, "not json").await.unwrap();
        assert!(manager.restore().await.is_none());
        assert!(manager.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_persist_then_clear() {
        let (manager, store) = manager();
        manager
            .persist(&Session::new("tok", User::new("bob", Role::User)))
            .await
            .unwrap();
        assert_eq!(store.len().await, 2);

        manager.clear().await;
        assert!(store.is_empty().await);
        assert!(manager.restore().await.is_none());
    }
}
