//! Unified path management for ragc files.
//!
//! ```text
//! ~/.config/ragc/          # Config directory (platform dependent)
//! ├── config.toml          # Client configuration
//! └── session.toml         # Persisted user / session identifiers
//! ```

use std::path::PathBuf;
use thiserror::Error;

const APP_DIR: &str = "ragc";
const CONFIG_FILE: &str = "config.toml";
const SESSION_FILE: &str = "session.toml";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot find config directory")]
    ConfigDirNotFound,
}

pub struct RagcPaths;

impl RagcPaths {
    /// Returns the ragc configuration directory (e.g. `~/.config/ragc/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Default location of the persisted identifiers.
    pub fn session_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(SESSION_FILE))
    }
}
