#![allow(dead_code)]

use async_trait::async_trait;
use ragc_core::config::ClientConfig;
use ragc_core::session::{SESSION_ID_KEY, USER_ID_KEY};
use ragc_core::{RagClientError, Result};
use ragc_infrastructure::InMemorySessionStore;
use ragc_interaction::{ApiRequest, HttpTransport, RagServiceClient, RawResponse};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

pub const BASE_URL: &str = "http://localhost:8080";

/// What the stub answers with.
#[derive(Clone)]
pub enum Reply {
    Status(u16, &'static str),
    /// Fails before completing with an I/O fault carrying this message
    Fault(&'static str),
}

/// Transport that records every request and answers with a fixed reply.
pub struct StubTransport {
    reply: Reply,
    requests: Mutex<Vec<ApiRequest>>,
}

impl StubTransport {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn ok(body: &'static str) -> Arc<Self> {
        Self::new(Reply::Status(200, body))
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> ApiRequest {
        self.requests().pop().expect("no request was captured")
    }

    pub fn clear(&self) {
        self.requests.lock().unwrap().clear();
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(request);
        match &self.reply {
            Reply::Status(status, body) => Ok(RawResponse::new(*status, *body)),
            Reply::Fault(message) => Err(RagClientError::transport(
                "stub fault",
                std::io::Error::new(std::io::ErrorKind::ConnectionReset, *message),
            )),
        }
    }
}

/// Store pre-populated with `user_1` / `session_1`.
pub fn known_store() -> Arc<InMemorySessionStore> {
    Arc::new(InMemorySessionStore::with_entries([
        (USER_ID_KEY, "user_1"),
        (SESSION_ID_KEY, "session_1"),
    ]))
}

pub async fn client_with(transport: Arc<StubTransport>) -> RagServiceClient {
    RagServiceClient::new(&ClientConfig::new(BASE_URL), transport, known_store())
        .await
        .unwrap()
}

/// One event seen by [`LogCapture`].
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub operation: Option<String>,
    pub message: String,
}

/// Tracing layer that keeps every event emitted on the current thread.
#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
    /// Installs the capture as the thread-local default subscriber until the
    /// guard is dropped. Tests using it must run on a current-thread runtime.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn errors(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.level == Level::ERROR)
            .cloned()
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = EventFields::default();
        event.record(&mut fields);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            operation: fields.operation,
            message: fields.message,
        });
    }
}

#[derive(Default)]
struct EventFields {
    operation: Option<String>,
    message: String,
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "operation" => self.operation = Some(value.to_string()),
            "message" => self.message = value.to_string(),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "operation" => self.operation = Some(format!("{:?}", value)),
            "message" => self.message = format!("{:?}", value),
            _ => {}
        }
    }
}
