//! `HttpTransport` backed by reqwest.

use crate::transport::{ApiRequest, HttpMethod, HttpTransport, RawResponse, RequestBody};
use async_trait::async_trait;
use ragc_core::{RagClientError, Result};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Transport that performs real HTTP requests.
///
/// No timeout is applied unless one is configured. A cancellation token, if
/// attached, aborts every in-flight request made through this transport with
/// [`RagClientError::Cancelled`].
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Option<Duration>,
    cancellation: Option<CancellationToken>,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Uses a preconfigured client (proxy, TLS, pool settings).
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            timeout: None,
            cancellation: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn build(&self, request: ApiRequest) -> reqwest::RequestBuilder {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, request.url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(upload) => {
                let part = Part::bytes(upload.bytes).file_name(upload.file_name);
                let mut form = Form::new().part("file", part);
                if let Some(metadata) = upload.metadata {
                    form = form.text("metadata", metadata);
                }
                builder.multipart(form)
            }
        }
    }

    async fn perform(&self, request: ApiRequest) -> Result<RawResponse> {
        let response = self
            .build(request)
            .send()
            .await
            .map_err(|e| RagClientError::transport("request failed", e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| RagClientError::transport("failed to read response body", e))?;

        Ok(RawResponse::new(status, body.to_vec()))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        match &self.cancellation {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(RagClientError::Cancelled),
                    result = self.perform(request) => result,
                }
            }
            None => self.perform(request).await,
        }
    }
}
