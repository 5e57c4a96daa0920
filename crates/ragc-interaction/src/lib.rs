//! HTTP side of the RAG service client.
//!
//! [`RagServiceClient`] maps one method to one backend endpoint. Requests are
//! described as [`ApiRequest`] values and handed to an [`HttpTransport`], so
//! the wire layer can be swapped for a stub in tests.

mod boundary;
pub mod intent_rule_client;
pub mod rag_service_client;
pub mod reqwest_transport;
pub mod transport;

pub use boundary::Operation;
pub use intent_rule_client::IntentRuleAdminClient;
pub use rag_service_client::RagServiceClient;
pub use reqwest_transport::ReqwestTransport;
pub use transport::{ApiRequest, HttpMethod, HttpTransport, MultipartBody, RawResponse, RequestBody};
