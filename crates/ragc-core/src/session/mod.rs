//! Session domain module.
//!
//! Holds the identifiers every request is attributed to and the storage
//! abstraction that keeps them across restarts.
//!
//! # Module Structure
//!
//! - `model`: `ClientSession` snapshot and storage keys
//! - `identifier`: identifier generation and validation
//! - `store`: `SessionStore` trait and identifier resolution
//!
//! # Usage
//!
//! ```ignore
//! use ragc_core::session::{ClientSession, SessionStore, resolve_identifiers};
//! ```

mod identifier;
mod model;
mod store;

// Re-export public API
pub use identifier::{generate_identifier, is_valid_identifier, SESSION_PREFIX, USER_PREFIX};
pub use model::{ClientSession, SESSION_ID_KEY, USER_ID_KEY};
pub use store::{resolve_identifier, resolve_identifiers, SessionStore};
