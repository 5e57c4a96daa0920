//! ClientSession domain model.

use serde::{Deserialize, Serialize};

/// Storage key for the persisted user identifier.
pub const USER_ID_KEY: &str = "rag_user_id";

/// Storage key for the persisted session identifier.
pub const SESSION_ID_KEY: &str = "rag_session_id";

/// The identifiers a request is attributed to, plus the service base URL.
///
/// A client keeps one snapshot at a time and replaces it wholesale when the
/// user identifier changes, so a request always sees a consistent triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSession {
    /// Absolute origin plus optional path prefix, without trailing slash
    pub base_url: String,
    pub user_id: String,
    pub session_id: String,
}

impl ClientSession {
    pub fn new(
        base_url: impl Into<String>,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id: user_id.into(),
            session_id: session_id.into(),
        }
    }

    /// Returns a copy with the user identifier replaced.
    pub fn with_user_id(&self, user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..self.clone()
        }
    }
}
