//! Loads `ClientConfig` from `config.toml` and the environment.
//!
//! Resolution order, later wins: built-in defaults, config file, `RAG_*`
//! environment variables. Command-line flags are applied by the caller.

use crate::paths::RagcPaths;
use ragc_core::config::ClientConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Loads the configuration.
///
/// An explicit `path` must exist. Without one, the platform default
/// `config.toml` is read if present and silently skipped otherwise.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an injectable environment lookup.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let from_file = match path {
        Some(explicit) => {
            if !explicit.exists() {
                return Err(ConfigError::NotFound(explicit.to_path_buf()));
            }
            read_config_file(explicit)?
        }
        None => match RagcPaths::config_file() {
            Ok(default_path) if default_path.exists() => read_config_file(&default_path)?,
            _ => {
                tracing::debug!("[ConfigLoader] No config file, using defaults");
                ClientConfig::default()
            }
        },
    };

    Ok(from_file.with_env_overrides(lookup))
}

fn read_config_file(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config: ClientConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("[ConfigLoader] Loaded config from {:?}", path);
    Ok(config)
}
