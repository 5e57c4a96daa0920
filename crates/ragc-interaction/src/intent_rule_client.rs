//! Client for the intent-rule administration endpoints.
//!
//! Intent rules tell the service how to route a query to a processor. Rule
//! bodies are passed through as-is.

use crate::boundary::{Operation, endpoint, execute, path_param};
use crate::transport::{ApiRequest, HttpTransport};
use ragc_core::Result;
use ragc_core::config::INTENT_RULE_API_PATH;
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;

#[derive(Clone)]
pub struct IntentRuleAdminClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl IntentRuleAdminClient {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    pub async fn list_rules(&self) -> Result<Value> {
        let request = self.url(&[]).map(ApiRequest::get);
        self.run(Operation::ListIntentRules, request).await
    }

    pub async fn create_rule<T: Serialize + ?Sized>(&self, rule: &T) -> Result<Value> {
        let request = self
            .url(&[])
            .and_then(|url| ApiRequest::post_json(url, rule));
        self.run(Operation::CreateIntentRule, request).await
    }

    pub async fn update_rule<T: Serialize + ?Sized>(
        &self,
        id: impl Display,
        rule: &T,
    ) -> Result<Value> {
        let request = path_param("rule id", id)
            .and_then(|id| self.url(&[id.as_str()]))
            .and_then(|url| ApiRequest::put_json(url, rule));
        self.run(Operation::UpdateIntentRule, request).await
    }

    pub async fn delete_rule(&self, id: impl Display) -> Result<Value> {
        let request = path_param("rule id", id)
            .and_then(|id| self.url(&[id.as_str()]))
            .map(ApiRequest::delete);
        self.run(Operation::DeleteIntentRule, request).await
    }

    /// Asks the service to reload its rule cache.
    pub async fn refresh_rules(&self) -> Result<Value> {
        let request = self.url(&["refresh"]).map(ApiRequest::post);
        self.run(Operation::RefreshIntentRules, request).await
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        endpoint(&self.base_url, INTENT_RULE_API_PATH, segments)
    }

    async fn run(&self, operation: Operation, request: Result<ApiRequest>) -> Result<Value> {
        execute(self.transport.as_ref(), operation, request).await
    }
}
