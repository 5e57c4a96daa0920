//! Query request model and parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RagClientError, Result};
use crate::session::ClientSession;

/// Body of `POST /query` and `POST /query/async`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub query: String,
    pub user_id: String,
    pub session_id: String,
    /// Opaque passthrough, never validated by the client
    pub params: Map<String, Value>,
}

impl QueryRequest {
    /// Builds a request attributed to `session`.
    ///
    /// Rejects a query that is empty or whitespace only.
    pub fn new(query: &str, session: &ClientSession, params: QueryParams) -> Result<Self> {
        if query.trim().is_empty() {
            return Err(RagClientError::invalid_input("query must not be empty"));
        }

        Ok(Self {
            query: query.to_string(),
            user_id: session.user_id.clone(),
            session_id: session.session_id.clone(),
            params: params.into_map(),
        })
    }
}

/// Query parameters understood by the service.
///
/// Unset fields are left out of the request so the service applies its own
/// defaults. Anything not covered by a typed field goes into `extra`.
///
/// # Example
///
/// ```
/// use ragc_core::query::QueryParams;
/// use serde_json::json;
///
/// let params = QueryParams::new().top_k(5).reranker_enabled(true);
/// assert_eq!(
///     serde_json::Value::Object(params.into_map()),
///     json!({"topK": 5, "rerankerEnabled": true})
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Minimum relevance score (0-1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    /// Similarity threshold (0-1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_multiplier: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reranker_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_query_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_rag_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyde_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_back_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarify: Option<bool>,
    /// Forces a processing type, bypassing intent routing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an arbitrary JSON object as parameters.
    ///
    /// `null` is treated as no parameters; any other non-object is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Ok(Self::from(map)),
            other => Err(RagClientError::invalid_input(format!(
                "query params must be a JSON object, got {}",
                other
            ))),
        }
    }

    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    pub fn similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = Some(threshold);
        self
    }

    pub fn router(mut self, router: impl Into<String>) -> Self {
        self.router = Some(router.into());
        self
    }

    pub fn index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn candidate_multiplier(mut self, multiplier: u32) -> Self {
        self.candidate_multiplier = Some(multiplier);
        self
    }

    pub fn reranker_enabled(mut self, enabled: bool) -> Self {
        self.reranker_enabled = Some(enabled);
        self
    }

    pub fn multi_query_enabled(mut self, enabled: bool) -> Self {
        self.multi_query_enabled = Some(enabled);
        self
    }

    pub fn self_rag_enabled(mut self, enabled: bool) -> Self {
        self.self_rag_enabled = Some(enabled);
        self
    }

    pub fn hyde_enabled(mut self, enabled: bool) -> Self {
        self.hyde_enabled = Some(enabled);
        self
    }

    pub fn step_back_enabled(mut self, enabled: bool) -> Self {
        self.step_back_enabled = Some(enabled);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn clarify(mut self, clarify: bool) -> Self {
        self.clarify = Some(clarify);
        self
    }

    pub fn force_type(mut self, force_type: impl Into<String>) -> Self {
        self.force_type = Some(force_type.into());
        self
    }

    /// Adds an arbitrary parameter.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Flattens the parameters into the JSON object sent on the wire.
    ///
    /// A typed field that is set wins over an `extra` key with the same
    /// wire name.
    pub fn into_map(mut self) -> Map<String, Value> {
        let mut map = std::mem::take(&mut self.extra);
        if let Ok(Value::Object(typed)) = serde_json::to_value(self) {
            map.extend(typed);
        }
        map
    }
}

impl From<Map<String, Value>> for QueryParams {
    fn from(map: Map<String, Value>) -> Self {
        // Keep every key verbatim in `extra` so nothing is coerced or dropped.
        Self {
            extra: map,
            ..Self::default()
        }
    }
}
