//! File-backed `SessionStore`.
//!
//! Identifiers are kept as a flat TOML table:
//!
//! ```toml
//! rag_session_id = "session_1726000000000_k3j9x0a1b"
//! rag_user_id = "user_1726000000000_p0q8w7e6r"
//! ```

use crate::paths::RagcPaths;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use ragc_core::session::SessionStore;
use ragc_core::{RagClientError, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

type SessionTable = BTreeMap<String, String>;

/// Session store persisted to a TOML file.
///
/// File I/O runs on the blocking pool so callers on the async runtime are
/// never stalled by disk latency.
#[derive(Clone)]
pub struct FileSessionStore {
    file: Arc<AtomicTomlFile<SessionTable>>,
}

impl FileSessionStore {
    /// Creates a store backed by `path`. The file is created on first write.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }

    /// Creates a store at the platform default location.
    pub fn new_default() -> Result<Self> {
        let path = RagcPaths::session_file().map_err(|e| RagClientError::store(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let file = Arc::clone(&self.file);
        let key = key.to_string();

        let table = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| RagClientError::store(format!("session store task failed: {}", e)))?
            .map_err(|e| RagClientError::store(e.to_string()))?;

        Ok(table.and_then(|mut t| t.remove(&key)))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let file = Arc::clone(&self.file);
        let key = key.to_string();
        let value = value.to_string();

        tokio::task::spawn_blocking(move || {
            file.update(SessionTable::new(), |table| {
                table.insert(key, value);
            })
        })
        .await
        .map_err(|e| RagClientError::store(format!("session store task failed: {}", e)))?
        .map_err(|e| RagClientError::store(e.to_string()))?;

        tracing::debug!("[FileSessionStore] Persisted identifier to {:?}", self.file.path());
        Ok(())
    }

    /// Checks and writes under the file lock, so processes starting together
    /// settle on the same value.
    async fn get_or_insert(
        &self,
        key: &str,
        candidate: &str,
        accept: for<'a> fn(&'a str) -> bool,
    ) -> Result<(String, bool)> {
        let file = Arc::clone(&self.file);
        let key = key.to_string();
        let candidate = candidate.to_string();

        let (value, inserted) = tokio::task::spawn_blocking(move || {
            file.modify(SessionTable::new(), |table| {
                match table.get(&key).filter(|v| accept(v)) {
                    Some(existing) => ((existing.clone(), false), false),
                    None => {
                        table.insert(key, candidate.clone());
                        ((candidate, true), true)
                    }
                }
            })
        })
        .await
        .map_err(|e| RagClientError::store(format!("session store task failed: {}", e)))?
        .map_err(|e| RagClientError::store(e.to_string()))?;

        if inserted {
            tracing::debug!("[FileSessionStore] Persisted identifier to {:?}", self.file.path());
        }
        Ok((value, inserted))
    }
}
