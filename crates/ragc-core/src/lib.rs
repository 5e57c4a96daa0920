pub mod config;
pub mod document;
pub mod error;
pub mod query;
pub mod session;

// Re-export common error type
pub use error::{RagClientError, Result};
