//! Document ingestion and listing models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RagClientError, Result};

/// Free-form document metadata, passed to the service unvalidated.
pub type DocumentMetadata = Map<String, Value>;

/// Default page number for document listing.
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size for document listing.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// The three ways a document can be added to the service.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadPayload {
    /// Raw file contents, sent as a multipart body
    File {
        file_name: String,
        bytes: Vec<u8>,
        metadata: Option<DocumentMetadata>,
    },
    /// A remote URL the service fetches itself
    Url {
        url: String,
        metadata: DocumentMetadata,
    },
    /// Inline text
    Text {
        title: String,
        content: String,
        metadata: DocumentMetadata,
    },
}

impl UploadPayload {
    pub fn file(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::File {
            file_name: file_name.into(),
            bytes,
            metadata: None,
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::Url {
            url: url.into(),
            metadata: DocumentMetadata::new(),
        }
    }

    pub fn text(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Text {
            title: title.into(),
            content: content.into(),
            metadata: DocumentMetadata::new(),
        }
    }

    /// Attaches metadata to any variant.
    pub fn with_metadata(self, new_metadata: DocumentMetadata) -> Self {
        match self {
            Self::File {
                file_name, bytes, ..
            } => Self::File {
                file_name,
                bytes,
                metadata: Some(new_metadata),
            },
            Self::Url { url, .. } => Self::Url {
                url,
                metadata: new_metadata,
            },
            Self::Text { title, content, .. } => Self::Text {
                title,
                content,
                metadata: new_metadata,
            },
        }
    }

    /// Short label used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::File { .. } => "file",
            Self::Url { .. } => "url",
            Self::Text { .. } => "text",
        }
    }
}

/// JSON body of `POST /documents/url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlDocumentRequest {
    pub url: String,
    pub metadata: DocumentMetadata,
}

/// JSON body of `POST /documents/text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextDocumentRequest {
    pub title: String,
    pub content: String,
    pub metadata: DocumentMetadata,
}

/// Paging and filtering for `GET /documents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingParams {
    /// 1-based page number
    pub page: u32,
    pub size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Default for PagingParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
            status: None,
        }
    }
}

impl PagingParams {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            status: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Checks that page and size are at least 1.
    pub fn validate(&self) -> Result<()> {
        if self.page < 1 {
            return Err(RagClientError::invalid_input("page must be >= 1"));
        }
        if self.size < 1 {
            return Err(RagClientError::invalid_input("size must be >= 1"));
        }
        Ok(())
    }

    /// Query string pairs in wire order. An empty status filter is omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("status", status.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paging_defaults() {
        let paging = PagingParams::default();
        assert_eq!(paging.page, 1);
        assert_eq!(paging.size, 10);
        assert!(paging.status.is_none());
        assert!(paging.validate().is_ok());
    }

    #[test]
    fn test_paging_rejects_zero() {
        assert!(PagingParams::new(0, 10).validate().is_err());
        assert!(PagingParams::new(1, 0).validate().is_err());
    }

    #[test]
    fn test_paging_query_pairs() {
        let pairs = PagingParams::new(2, 20).with_status("COMPLETED").query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page", "2".to_string()),
                ("size", "20".to_string()),
                ("status", "COMPLETED".to_string()),
            ]
        );

        let pairs = PagingParams::default().with_status("").query_pairs();
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_with_metadata_applies_to_every_variant() {
        let mut metadata = DocumentMetadata::new();
        metadata.insert("source".to_string(), json!("wiki"));

        match UploadPayload::file("a.pdf", vec![1, 2]).with_metadata(metadata.clone()) {
            UploadPayload::File { metadata: m, .. } => assert_eq!(m, Some(metadata.clone())),
            other => panic!("unexpected variant: {:?}", other),
        }
        match UploadPayload::url("https://example.com").with_metadata(metadata.clone()) {
            UploadPayload::Url { metadata: m, .. } => assert_eq!(m, metadata),
            other => panic!("unexpected variant: {:?}", other),
        }
        assert_eq!(UploadPayload::text("t", "c").kind(), "text");
    }

    #[test]
    fn test_text_document_request_shape() {
        let body = TextDocumentRequest {
            title: "Intro".to_string(),
            content: "RAG combines retrieval and generation.".to_string(),
            metadata: DocumentMetadata::new(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"title": "Intro", "content": "RAG combines retrieval and generation.", "metadata": {}})
        );
    }
}
