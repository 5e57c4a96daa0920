//! Error types for the RAG service client.

use thiserror::Error;

/// Boxed error used as the underlying cause of a transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A shared error type for every client operation.
///
/// Request failures fall into three kinds: the server answered with a
/// non-success status, the request could not be completed, or the caller
/// aborted it. The remaining variants are raised before a request is built.
#[derive(Error, Debug)]
pub enum RagClientError {
    /// The server responded with a non-2xx status.
    #[error("API request failed with status {status_code}")]
    RequestFailed {
        status_code: u16,
        /// Response body text, kept for diagnostics only.
        body: String,
    },

    /// The request could not be completed (network, URL, serialization, decoding).
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: BoxError,
    },

    /// The request was aborted by the caller.
    #[error("Request cancelled")]
    Cancelled,

    /// Input rejected before any request was issued
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The persisted session store could not be read or written
    #[error("Session store error: {0}")]
    Store(String),
}

impl RagClientError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a RequestFailed error
    pub fn request_failed(status_code: u16, body: impl Into<String>) -> Self {
        Self::RequestFailed {
            status_code,
            body: body.into(),
        }
    }

    /// Creates a Transport error wrapping the underlying fault
    pub fn transport(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a Store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Returns the HTTP status code if the server rejected the request.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    pub fn is_request_failed(&self) -> bool {
        matches!(self, Self::RequestFailed { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// A type alias for `Result<T, RagClientError>`.
pub type Result<T> = std::result::Result<T, RagClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_status_code_only_for_request_failed() {
        let err = RagClientError::request_failed(500, "boom");
        assert_eq!(err.status_code(), Some(500));
        assert!(err.is_request_failed());

        assert_eq!(RagClientError::Cancelled.status_code(), None);
    }

    #[test]
    fn test_transport_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = RagClientError::transport("send failed", io);

        assert!(err.is_transport());
        let source = err.source().expect("transport error should carry a source");
        assert_eq!(source.to_string(), "reset by peer");
        assert!(source.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            RagClientError::request_failed(404, "").to_string(),
            "API request failed with status 404"
        );
        assert_eq!(RagClientError::Cancelled.to_string(), "Request cancelled");
        assert_eq!(
            RagClientError::invalid_input("query must not be empty").to_string(),
            "Invalid input: query must not be empty"
        );
    }
}
