//! In-memory `SessionStore`, for tests and ephemeral clients.

use async_trait::async_trait;
use ragc_core::Result;
use ragc_core::session::SessionStore;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Session store that keeps values for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get_or_insert(
        &self,
        key: &str,
        candidate: &str,
        accept: for<'a> fn(&'a str) -> bool,
    ) -> Result<(String, bool)> {
        let mut values = self.values.write().await;
        if let Some(existing) = values.get(key).filter(|v| accept(v)) {
            return Ok((existing.clone(), false));
        }
        values.insert(key.to_string(), candidate.to_string());
        Ok((candidate.to_string(), true))
    }
}
