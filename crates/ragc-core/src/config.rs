use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Path prefix of the RAG endpoints.
pub const RAG_API_PATH: &str = "/api/rag";

/// Path prefix of the intent-rule administration endpoints.
pub const INTENT_RULE_API_PATH: &str = "/api/admin/intent-rules";

pub const ENV_BASE_URL: &str = "RAG_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "RAG_TIMEOUT_SECS";
pub const ENV_STATE_PATH: &str = "RAG_STATE_PATH";

/// Client configuration.
///
/// Every field is optional in `config.toml`; missing ones fall back to
/// [`ClientConfig::default`].
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin (and optional path prefix) of the service
    pub base_url: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout_secs: Option<u64>,
    /// Where the session identifiers are persisted. `None` uses the platform default.
    pub state_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            state_path: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Applies `RAG_BASE_URL`, `RAG_TIMEOUT_SECS` and `RAG_STATE_PATH`.
    ///
    /// `lookup` abstracts the environment so tests need not mutate process state.
    /// Unparseable or empty values are ignored.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = base_url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS).and_then(|v| v.trim().parse::<u64>().ok()) {
            self.timeout_secs = Some(secs);
        }
        if let Some(path) = lookup(ENV_STATE_PATH).filter(|v| !v.trim().is_empty()) {
            self.state_path = Some(PathBuf::from(path));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert!(config.timeout().is_none());
        assert!(config.state_path.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("RAG_BASE_URL", "https://rag.example.com"),
            ("RAG_TIMEOUT_SECS", "30"),
        ]);

        let config = ClientConfig::default()
            .with_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_url, "https://rag.example.com");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert!(config.state_path.is_none());
    }

    #[test]
    fn test_env_overrides_ignore_garbage() {
        let config = ClientConfig::new("http://keep")
            .with_env_overrides(|key| match key {
                "RAG_TIMEOUT_SECS" => Some("soon".to_string()),
                "RAG_BASE_URL" => Some("  ".to_string()),
                _ => None,
            });

        assert_eq!(config.base_url, "http://keep");
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, Some(5));
    }
}
