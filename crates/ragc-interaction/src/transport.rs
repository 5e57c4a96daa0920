//! Transport abstraction.
//!
//! A request is fully described by an [`ApiRequest`] before it reaches the
//! network, which keeps request construction deterministic and observable.

use async_trait::async_trait;
use ragc_core::{RagClientError, Result};
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Multipart upload with a `file` part and an optional `metadata` part.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartBody {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Metadata already encoded as a JSON string
    pub metadata: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(MultipartBody),
}

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: HttpMethod::Get,
            url,
            body: RequestBody::Empty,
        }
    }

    pub fn delete(url: Url) -> Self {
        Self {
            method: HttpMethod::Delete,
            url,
            body: RequestBody::Empty,
        }
    }

    /// POST without a body.
    pub fn post(url: Url) -> Self {
        Self {
            method: HttpMethod::Post,
            url,
            body: RequestBody::Empty,
        }
    }

    pub fn post_json<T: Serialize + ?Sized>(url: Url, body: &T) -> Result<Self> {
        Ok(Self {
            method: HttpMethod::Post,
            url,
            body: RequestBody::Json(to_json(body)?),
        })
    }

    pub fn put_json<T: Serialize + ?Sized>(url: Url, body: &T) -> Result<Self> {
        Ok(Self {
            method: HttpMethod::Put,
            url,
            body: RequestBody::Json(to_json(body)?),
        })
    }

    pub fn post_multipart(url: Url, body: MultipartBody) -> Self {
        Self {
            method: HttpMethod::Post,
            url,
            body: RequestBody::Multipart(body),
        }
    }

    /// Path plus query string, e.g. `/api/rag/documents?page=1&size=10`.
    pub fn path_and_query(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }

    /// The JSON body, if any.
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

fn to_json<T: Serialize + ?Sized>(body: &T) -> Result<Value> {
    serde_json::to_value(body)
        .map_err(|e| RagClientError::transport("failed to serialize request body", e))
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends one request and returns whatever the server answered.
///
/// Implementations report only completion problems: `Transport` for faults
/// and `Cancelled` for caller aborts. Any HTTP status, including errors, is
/// returned as a `RawResponse` and judged by the caller.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_path_and_query() {
        let request = ApiRequest::get(url("http://host/api/rag/documents?page=1&size=10"));
        assert_eq!(request.path_and_query(), "/api/rag/documents?page=1&size=10");

        let request = ApiRequest::delete(url("http://host/api/rag/documents/7"));
        assert_eq!(request.path_and_query(), "/api/rag/documents/7");
        assert_eq!(request.method.to_string(), "DELETE");
    }

    #[test]
    fn test_post_json_captures_body() {
        let request =
            ApiRequest::post_json(url("http://host/api/rag/settings/u"), &json!({"theme": "dark"}))
                .unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.json_body(), Some(&json!({"theme": "dark"})));
    }

    #[test]
    fn test_raw_response_success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(!RawResponse::new(302, "").is_success());
        assert!(!RawResponse::new(500, "oops").is_success());
        assert_eq!(RawResponse::new(500, "oops").body_text(), "oops");
    }
}
