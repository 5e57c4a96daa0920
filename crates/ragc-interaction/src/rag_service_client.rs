//! RagServiceClient - typed client for the `/api/rag` endpoints.
//!
//! Every call snapshots the current [`ClientSession`] once, builds exactly one
//! [`ApiRequest`] and passes it through the shared error boundary, which logs
//! failures before returning them.

use crate::boundary::{Operation, endpoint, execute, path_param};
use crate::intent_rule_client::IntentRuleAdminClient;
use crate::reqwest_transport::ReqwestTransport;
use crate::transport::{ApiRequest, HttpTransport, MultipartBody};
use ragc_core::config::{ClientConfig, RAG_API_PATH};
use ragc_core::document::{
    DocumentMetadata, PagingParams, TextDocumentRequest, UploadPayload, UrlDocumentRequest,
};
use ragc_core::query::{QueryParams, QueryRequest};
use ragc_core::session::{
    ClientSession, SESSION_ID_KEY, SESSION_PREFIX, SessionStore, USER_ID_KEY, USER_PREFIX,
    is_valid_identifier, resolve_identifier,
};
use ragc_core::{RagClientError, Result};
use ragc_infrastructure::FileSessionStore;
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Default number of history records requested.
pub const DEFAULT_HISTORY_LIMIT: u32 = 10;

/// Client for a RAG service.
///
/// Cheap to share behind an `Arc`; all methods take `&self` and may run
/// concurrently.
pub struct RagServiceClient {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn SessionStore>,
    session: RwLock<Arc<ClientSession>>,
}

impl RagServiceClient {
    /// Creates a client, resolving the persisted identifiers.
    ///
    /// Missing identifiers are generated and written to `store` before this
    /// returns.
    pub async fn new(
        config: &ClientConfig,
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        let user_id = Self::resolve(store.as_ref(), USER_ID_KEY, USER_PREFIX).await?;
        let session_id = Self::resolve(store.as_ref(), SESSION_ID_KEY, SESSION_PREFIX).await?;

        let session = ClientSession::new(config.base_url.clone(), user_id, session_id);
        tracing::debug!(
            "[RagServiceClient] Initialized for {} (user: {}, session: {})",
            session.base_url,
            session.user_id,
            session.session_id
        );

        Ok(Self {
            transport,
            store,
            session: RwLock::new(Arc::new(session)),
        })
    }

    /// Creates a client with the reqwest transport and the file-backed store
    /// described by `config`.
    pub async fn from_config(config: &ClientConfig) -> Result<Self> {
        let store = match &config.state_path {
            Some(path) => FileSessionStore::with_path(path.clone()),
            None => FileSessionStore::new_default()?,
        };
        let transport = ReqwestTransport::new().with_timeout(config.timeout());

        Self::new(config, Arc::new(transport), Arc::new(store)).await
    }

    async fn resolve(store: &dyn SessionStore, key: &str, prefix: &str) -> Result<String> {
        match resolve_identifier(store, key, prefix).await {
            Ok((id, generated)) => {
                if generated {
                    tracing::info!("[RagServiceClient] Generated new {} identifier: {}", prefix, id);
                }
                Ok(id)
            }
            Err(e) => {
                tracing::error!("[RagServiceClient] Failed to resolve {}: {}", key, e);
                Err(e)
            }
        }
    }

    // ============================================================================
    // Session identifiers
    // ============================================================================

    /// Current identifiers. The returned snapshot never changes.
    pub async fn session(&self) -> Arc<ClientSession> {
        Arc::clone(&*self.session.read().await)
    }

    pub async fn user_id(&self) -> String {
        self.session().await.user_id.clone()
    }

    pub async fn session_id(&self) -> String {
        self.session().await.session_id.clone()
    }

    /// Replaces the user identifier, e.g. after login.
    ///
    /// The new value is persisted first; the in-memory snapshot is swapped
    /// only once the store accepted it. Requests already in flight keep the
    /// identifiers they started with.
    pub async fn set_user_id(&self, user_id: &str) -> Result<()> {
        if !is_valid_identifier(user_id) {
            return Err(RagClientError::invalid_input(format!(
                "'{}' is not a valid user id",
                user_id
            )));
        }

        let mut current = self.session.write().await;
        if let Err(e) = self.store.set(USER_ID_KEY, user_id).await {
            tracing::error!("[RagServiceClient] Failed to persist user id: {}", e);
            return Err(e);
        }
        *current = Arc::new(current.with_user_id(user_id));

        tracing::info!("[RagServiceClient] User id set to {}", user_id);
        Ok(())
    }

    /// Client for the intent-rule administration endpoints of the same service.
    pub async fn intent_rules(&self) -> IntentRuleAdminClient {
        let base_url = self.session().await.base_url.clone();
        IntentRuleAdminClient::new(base_url, Arc::clone(&self.transport))
    }

    // ============================================================================
    // Queries
    // ============================================================================

    /// Runs a query synchronously on the service.
    pub async fn send_query(&self, query: &str, params: QueryParams) -> Result<Value> {
        let session = self.session().await;
        let request = QueryRequest::new(query, &session, params)
            .and_then(|body| ApiRequest::post_json(rag_url(&session, &["query"])?, &body));
        self.run(Operation::Query, request).await
    }

    /// Submits a query for background processing; returns the task handle.
    pub async fn send_query_async(&self, query: &str, params: QueryParams) -> Result<Value> {
        let session = self.session().await;
        let request = QueryRequest::new(query, &session, params).and_then(|body| {
            ApiRequest::post_json(rag_url(&session, &["query", "async"])?, &body)
        });
        self.run(Operation::QueryAsync, request).await
    }

    pub async fn get_query_task_status(&self, task_id: &str) -> Result<Value> {
        let session = self.session().await;
        let request = path_param("task id", task_id)
            .and_then(|id| rag_url(&session, &["query", "status", id.as_str()]))
            .map(ApiRequest::get);
        self.run(Operation::TaskStatus, request).await
    }

    // ============================================================================
    // Documents
    // ============================================================================

    /// Adds a document using whichever ingestion route matches `payload`.
    pub async fn add_document(&self, payload: UploadPayload) -> Result<Value> {
        tracing::debug!("[RagServiceClient] Adding {} document", payload.kind());
        let session = self.session().await;

        let (operation, request) = match payload {
            UploadPayload::File {
                file_name,
                bytes,
                metadata,
            } => {
                let request = multipart_body(file_name, bytes, metadata).and_then(|body| {
                    Ok(ApiRequest::post_multipart(
                        rag_url(&session, &["documents", "upload"])?,
                        body,
                    ))
                });
                (Operation::UploadDocument, request)
            }
            UploadPayload::Url { url, metadata } => {
                let body = UrlDocumentRequest { url, metadata };
                let request = rag_url(&session, &["documents", "url"])
                    .and_then(|endpoint| ApiRequest::post_json(endpoint, &body));
                (Operation::AddDocumentFromUrl, request)
            }
            UploadPayload::Text {
                title,
                content,
                metadata,
            } => {
                let body = TextDocumentRequest {
                    title,
                    content,
                    metadata,
                };
                let request = rag_url(&session, &["documents", "text"])
                    .and_then(|endpoint| ApiRequest::post_json(endpoint, &body));
                (Operation::AddDocumentFromText, request)
            }
        };

        self.run(operation, request).await
    }

    /// Uploads raw file contents as `multipart/form-data`.
    pub async fn upload_document(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        metadata: Option<DocumentMetadata>,
    ) -> Result<Value> {
        self.add_document(UploadPayload::File {
            file_name: file_name.to_string(),
            bytes,
            metadata,
        })
        .await
    }

    pub async fn add_document_from_url(
        &self,
        url: &str,
        metadata: DocumentMetadata,
    ) -> Result<Value> {
        self.add_document(UploadPayload::Url {
            url: url.to_string(),
            metadata,
        })
        .await
    }

    pub async fn add_document_from_text(
        &self,
        title: &str,
        content: &str,
        metadata: DocumentMetadata,
    ) -> Result<Value> {
        self.add_document(UploadPayload::Text {
            title: title.to_string(),
            content: content.to_string(),
            metadata,
        })
        .await
    }

    pub async fn list_documents(&self, paging: &PagingParams) -> Result<Value> {
        let session = self.session().await;
        let request = paging
            .validate()
            .and_then(|_| rag_url(&session, &["documents"]))
            .map(|mut url| {
                url.query_pairs_mut().extend_pairs(paging.query_pairs());
                ApiRequest::get(url)
            });
        self.run(Operation::ListDocuments, request).await
    }

    pub async fn get_document(&self, id: impl Display) -> Result<Value> {
        let session = self.session().await;
        let request = path_param("document id", id)
            .and_then(|id| rag_url(&session, &["documents", id.as_str()]))
            .map(ApiRequest::get);
        self.run(Operation::GetDocument, request).await
    }

    pub async fn get_document_chunks(&self, id: impl Display) -> Result<Value> {
        let session = self.session().await;
        let request = path_param("document id", id)
            .and_then(|id| rag_url(&session, &["documents", id.as_str(), "chunks"]))
            .map(ApiRequest::get);
        self.run(Operation::GetDocumentChunks, request).await
    }

    /// Deletes a document.
    ///
    /// Returns the service's JSON confirmation, or `true` when the service
    /// answers with an empty body.
    pub async fn delete_document(&self, id: impl Display) -> Result<Value> {
        let session = self.session().await;
        let request = path_param("document id", id)
            .and_then(|id| rag_url(&session, &["documents", id.as_str()]))
            .map(ApiRequest::delete);

        let value = self.run(Operation::DeleteDocument, request).await?;
        Ok(match value {
            Value::Null => Value::Bool(true),
            other => other,
        })
    }

    // ============================================================================
    // History
    // ============================================================================

    /// Query history of the current user.
    pub async fn get_user_query_history(&self, limit: u32) -> Result<Value> {
        let session = self.session().await;
        let request = history_url(&session, "user", &session.user_id, limit).map(ApiRequest::get);
        self.run(Operation::UserQueryHistory, request).await
    }

    /// Query history of the current session.
    pub async fn get_session_query_history(&self, limit: u32) -> Result<Value> {
        let session = self.session().await;
        let request =
            history_url(&session, "session", &session.session_id, limit).map(ApiRequest::get);
        self.run(Operation::SessionQueryHistory, request).await
    }

    // ============================================================================
    // Settings & status
    // ============================================================================

    pub async fn get_user_settings(&self) -> Result<Value> {
        let session = self.session().await;
        let request = rag_url(&session, &["settings", session.user_id.as_str()]).map(ApiRequest::get);
        self.run(Operation::GetUserSettings, request).await
    }

    pub async fn save_user_settings<T>(&self, settings: &T) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        let session = self.session().await;
        let request = rag_url(&session, &["settings", session.user_id.as_str()])
            .and_then(|url| ApiRequest::post_json(url, settings));
        self.run(Operation::SaveUserSettings, request).await
    }

    pub async fn get_system_status(&self) -> Result<Value> {
        let session = self.session().await;
        let request = rag_url(&session, &["system", "status"]).map(ApiRequest::get);
        self.run(Operation::SystemStatus, request).await
    }

    async fn run(&self, operation: Operation, request: Result<ApiRequest>) -> Result<Value> {
        execute(self.transport.as_ref(), operation, request).await
    }
}

fn rag_url(session: &ClientSession, segments: &[&str]) -> Result<Url> {
    endpoint(&session.base_url, RAG_API_PATH, segments)
}

fn history_url(session: &ClientSession, scope: &str, id: &str, limit: u32) -> Result<Url> {
    let mut url = rag_url(session, &["history", scope, id])?;
    url.query_pairs_mut()
        .append_pair("limit", &limit.to_string());
    Ok(url)
}

fn multipart_body(
    file_name: String,
    bytes: Vec<u8>,
    metadata: Option<DocumentMetadata>,
) -> Result<MultipartBody> {
    // An empty metadata object is left out entirely.
    let metadata = match metadata.filter(|m| !m.is_empty()) {
        Some(m) => Some(serde_json::to_string(&m).map_err(|e| {
            RagClientError::transport("failed to serialize upload metadata", e)
        })?),
        None => None,
    };

    Ok(MultipartBody {
        file_name,
        bytes,
        metadata,
    })
}
