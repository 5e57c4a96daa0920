//! Session store trait.
//!
//! Defines the durable key/value capability that keeps the user and session
//! identifiers across restarts.

use async_trait::async_trait;

use super::identifier::{SESSION_PREFIX, USER_PREFIX, generate_identifier, is_valid_identifier};
use super::model::{SESSION_ID_KEY, USER_ID_KEY};
use crate::error::Result;

/// Durable storage for the two named identifier strings.
///
/// Implementations decide the medium (TOML file, memory, OS keychain). A
/// `set` must be visible to every later `get` on the same store.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Reads a stored value.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: Value present
    /// - `Ok(None)`: Key never written
    /// - `Err(_)`: Storage could not be read
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Returns the value under `key` when `accept` approves it; otherwise
    /// stores `candidate` and returns it.
    ///
    /// The flag is `true` when `candidate` was stored. The default reads and
    /// writes separately; stores shared between processes override it so the
    /// check and the write happen under one lock.
    async fn get_or_insert(
        &self,
        key: &str,
        candidate: &str,
        accept: for<'a> fn(&'a str) -> bool,
    ) -> Result<(String, bool)> {
        if let Some(existing) = self.get(key).await? {
            if accept(&existing) {
                return Ok((existing, false));
            }
        }
        self.set(key, candidate).await?;
        Ok((candidate.to_string(), true))
    }
}

/// Reads the identifier stored under `key`, generating and persisting a new
/// one with `prefix` if it is missing or unusable.
///
/// Returns the identifier and whether it was freshly generated.
pub async fn resolve_identifier(
    store: &dyn SessionStore,
    key: &str,
    prefix: &str,
) -> Result<(String, bool)> {
    let candidate = generate_identifier(prefix);
    store
        .get_or_insert(key, &candidate, is_valid_identifier)
        .await
}

/// Resolves both the user and the session identifier.
///
/// Returns `(user_id, session_id)`.
pub async fn resolve_identifiers(store: &dyn SessionStore) -> Result<(String, String)> {
    let (user_id, _) = resolve_identifier(store, USER_ID_KEY, USER_PREFIX).await?;
    let (session_id, _) = resolve_identifier(store, SESSION_ID_KEY, SESSION_PREFIX).await?;
    Ok((user_id, session_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore {
        values: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl SessionStore for MapStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_resolve_generates_and_persists() {
        let store = MapStore::default();

        let (user_id, session_id) = resolve_identifiers(&store).await.unwrap();

        assert!(user_id.starts_with("user_"));
        assert!(session_id.starts_with("session_"));
        assert_eq!(store.get(USER_ID_KEY).await.unwrap(), Some(user_id));
        assert_eq!(store.get(SESSION_ID_KEY).await.unwrap(), Some(session_id));
    }

    #[tokio::test]
    async fn test_resolve_reuses_existing() {
        let store = MapStore::default();
        store.set(USER_ID_KEY, "user_1").await.unwrap();

        let (id, generated) = resolve_identifier(&store, USER_ID_KEY, USER_PREFIX)
            .await
            .unwrap();

        assert_eq!(id, "user_1");
        assert!(!generated);
    }

    #[tokio::test]
    async fn test_resolve_replaces_unusable_value() {
        let store = MapStore::default();
        store.set(SESSION_ID_KEY, "").await.unwrap();

        let (id, generated) = resolve_identifier(&store, SESSION_ID_KEY, SESSION_PREFIX)
            .await
            .unwrap();

        assert!(generated);
        assert!(id.starts_with("session_"));
    }
}
