//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating and parsing `tola-assets.toml`.
///
/// Asset option values are never rejected here; they are validated
/// where they are used (see `AssetError::Configuration`).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config file `{0}` not found")]
    NotFound(PathBuf),
}
