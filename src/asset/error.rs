//! Asset pipeline errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::FieldPath;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum AssetError {
    /// An option value that can't be used (e.g. unknown cache type).
    #[error("invalid {field}: {message}")]
    Configuration { field: FieldPath, message: String },

    /// A literal precompile or raw target that no search path provides.
    #[error("asset `{0}` not found in any source directory")]
    NotFound(String),

    #[error("failed to compile `{}`", path.display())]
    Compile {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("IO error at `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),
}

impl AssetError {
    pub fn compile(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self::Compile {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io(path.into(), source)
    }
}
