//! Single error boundary shared by every client method.
//!
//! Builds the endpoint URL, sends the request, classifies the outcome and
//! logs any failure once before handing it back unchanged.

use crate::transport::{ApiRequest, HttpTransport, RawResponse};
use ragc_core::{RagClientError, Result};
use reqwest::Url;
use serde_json::Value;

/// Every backend operation the clients can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Query,
    QueryAsync,
    TaskStatus,
    UploadDocument,
    AddDocumentFromUrl,
    AddDocumentFromText,
    ListDocuments,
    GetDocument,
    GetDocumentChunks,
    DeleteDocument,
    UserQueryHistory,
    SessionQueryHistory,
    GetUserSettings,
    SaveUserSettings,
    SystemStatus,
    ListIntentRules,
    CreateIntentRule,
    UpdateIntentRule,
    DeleteIntentRule,
    RefreshIntentRules,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Query => "query",
            Operation::QueryAsync => "query_async",
            Operation::TaskStatus => "task_status",
            Operation::UploadDocument => "upload_document",
            Operation::AddDocumentFromUrl => "add_document_from_url",
            Operation::AddDocumentFromText => "add_document_from_text",
            Operation::ListDocuments => "list_documents",
            Operation::GetDocument => "get_document",
            Operation::GetDocumentChunks => "get_document_chunks",
            Operation::DeleteDocument => "delete_document",
            Operation::UserQueryHistory => "user_query_history",
            Operation::SessionQueryHistory => "session_query_history",
            Operation::GetUserSettings => "get_user_settings",
            Operation::SaveUserSettings => "save_user_settings",
            Operation::SystemStatus => "system_status",
            Operation::ListIntentRules => "list_intent_rules",
            Operation::CreateIntentRule => "create_intent_rule",
            Operation::UpdateIntentRule => "update_intent_rule",
            Operation::DeleteIntentRule => "delete_intent_rule",
            Operation::RefreshIntentRules => "refresh_intent_rules",
        }
    }

    /// Human-readable failure message logged at the boundary.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::Query => "Query request failed",
            Operation::QueryAsync => "Async query request failed",
            Operation::TaskStatus => "Failed to fetch task status",
            Operation::UploadDocument => "File upload failed",
            Operation::AddDocumentFromUrl => "Adding document from URL failed",
            Operation::AddDocumentFromText => "Adding text document failed",
            Operation::ListDocuments => "Failed to fetch document list",
            Operation::GetDocument => "Failed to fetch document details",
            Operation::GetDocumentChunks => "Failed to fetch document chunks",
            Operation::DeleteDocument => "Failed to delete document",
            Operation::UserQueryHistory => "Failed to fetch user query history",
            Operation::SessionQueryHistory => "Failed to fetch session query history",
            Operation::GetUserSettings => "Failed to fetch user settings",
            Operation::SaveUserSettings => "Failed to save user settings",
            Operation::SystemStatus => "Failed to fetch system status",
            Operation::ListIntentRules => "Failed to list intent rules",
            Operation::CreateIntentRule => "Failed to create intent rule",
            Operation::UpdateIntentRule => "Failed to update intent rule",
            Operation::DeleteIntentRule => "Failed to delete intent rule",
            Operation::RefreshIntentRules => "Failed to refresh intent rules",
        }
    }
}

/// Joins `base_url`, `api_path` and the percent-encoded `segments`.
///
/// `base_url` must be an origin with an optional path prefix; a query string
/// or fragment would end up in front of the API path, so it is rejected.
pub(crate) fn endpoint(base_url: &str, api_path: &str, segments: &[&str]) -> Result<Url> {
    let invalid = |reason: &str| {
        RagClientError::transport(
            format!("invalid base URL '{}'", base_url),
            reason.to_string(),
        )
    };

    let mut url = Url::parse(base_url)
        .map_err(|e| RagClientError::transport(format!("invalid base URL '{}'", base_url), e))?;
    if url.query().is_some() {
        return Err(invalid("base URL must not carry a query string"));
    }
    if url.fragment().is_some() {
        return Err(invalid("base URL must not carry a fragment"));
    }

    url.path_segments_mut()
        .map_err(|_| invalid("URL cannot be a base"))?
        .pop_if_empty()
        .extend(api_path.split('/').filter(|s| !s.is_empty()))
        .extend(segments);

    Ok(url)
}

/// Rejects an empty path parameter before it can collapse the route.
pub(crate) fn path_param(name: &str, value: impl ToString) -> Result<String> {
    let value = value.to_string();
    if value.trim().is_empty() {
        return Err(RagClientError::invalid_input(format!(
            "{} must not be empty",
            name
        )));
    }
    Ok(value)
}

/// Sends a built request and returns the decoded JSON body.
///
/// `request` is the outcome of request construction, so build failures go
/// through the same logging as network failures.
pub(crate) async fn execute(
    transport: &dyn HttpTransport,
    operation: Operation,
    request: Result<ApiRequest>,
) -> Result<Value> {
    let outcome = match request {
        Ok(request) => {
            tracing::debug!(
                operation = operation.as_str(),
                "{} {}",
                request.method,
                request.url
            );
            match transport.send(request).await {
                Ok(response) => decode(response),
                Err(err) => Err(err),
            }
        }
        Err(err) => Err(err),
    };

    if let Err(err) = &outcome {
        match std::error::Error::source(err) {
            Some(cause) => tracing::error!(
                operation = operation.as_str(),
                "{}: {}: {}",
                operation.failure_message(),
                err,
                cause
            ),
            None => tracing::error!(
                operation = operation.as_str(),
                "{}: {}",
                operation.failure_message(),
                err
            ),
        }
    }

    outcome
}

fn decode(response: RawResponse) -> Result<Value> {
    if !response.is_success() {
        return Err(RagClientError::request_failed(
            response.status,
            response.body_text(),
        ));
    }

    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&response.body)
        .map_err(|e| RagClientError::transport("failed to decode response body", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_joins_and_encodes() {
        let url = endpoint("http://localhost:8080/", "/api/rag", &["documents", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/rag/documents/a%20b%2Fc");
    }

    #[test]
    fn test_endpoint_keeps_base_prefix() {
        let url = endpoint("https://example.com/gateway", "/api/rag", &["query"]).unwrap();
        assert_eq!(url.path(), "/gateway/api/rag/query");
    }

    #[test]
    fn test_endpoint_rejects_malformed_base() {
        let err = endpoint("not a url", "/api/rag", &["query"]).unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_endpoint_rejects_query_and_fragment_in_base() {
        for base in [
            "http://h:8080/?tenant=a",
            "http://h:8080/prefix?tenant=a",
            "http://h:8080/#top",
            "mailto:ops@example.com",
        ] {
            let err = endpoint(base, "/api/rag", &["system", "status"]).unwrap_err();
            assert!(err.is_transport(), "{} should be rejected", base);
        }
    }

    #[test]
    fn test_endpoint_without_trailing_slash_or_segments() {
        let url = endpoint("http://localhost:8080", "/api/admin/intent-rules", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/admin/intent-rules");
    }

    #[test]
    fn test_path_param_rejects_blank() {
        assert!(path_param("document id", "  ").unwrap_err().is_invalid_input());
        assert_eq!(path_param("document id", 42).unwrap(), "42");
    }

    #[test]
    fn test_decode_classifies_status() {
        let err = decode(RawResponse::new(503, "unavailable")).unwrap_err();
        assert_eq!(err.status_code(), Some(503));

        assert_eq!(decode(RawResponse::new(200, r#"{"a":1}"#)).unwrap(), json!({"a": 1}));
        assert_eq!(decode(RawResponse::new(204, "")).unwrap(), Value::Null);
    }

    #[test]
    fn test_decode_invalid_json_is_transport() {
        let err = decode(RawResponse::new(200, "<html>")).unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_failure_messages_are_distinct() {
        let ops = [
            Operation::Query,
            Operation::QueryAsync,
            Operation::UploadDocument,
            Operation::DeleteDocument,
        ];
        let messages: std::collections::HashSet<_> =
            ops.iter().map(|op| op.failure_message()).collect();
        assert_eq!(messages.len(), ops.len());
    }
}
