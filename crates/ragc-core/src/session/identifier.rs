//! Anonymous identifier generation.
//!
//! Identifiers look like `user_1726000000000_k3j9x0a1b`: a prefix, the
//! creation time in milliseconds and a short random suffix. Uniqueness is
//! probabilistic; a collision only merges history attribution.

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Prefix for generated user identifiers.
pub const USER_PREFIX: &str = "user";

/// Prefix for generated session identifiers.
pub const SESSION_PREFIX: &str = "session";

const SUFFIX_LEN: usize = 9;

/// Generates a new identifier of the form `<prefix>_<millis>_<suffix>`.
///
/// # Example
///
/// ```
/// use ragc_core::session::{generate_identifier, is_valid_identifier};
///
/// let id = generate_identifier("user");
/// assert!(id.starts_with("user_"));
/// assert!(is_valid_identifier(&id));
/// ```
pub fn generate_identifier(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();

    format!("{}_{}_{}", prefix, millis, suffix)
}

/// Returns true if `id` can be interpolated into a URL path segment as-is.
///
/// Accepts non-empty strings made of ASCII alphanumerics, `_`, `-` and `.`,
/// excluding the dot segments `.` and `..`.
pub fn is_valid_identifier(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
