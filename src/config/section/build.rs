//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! source = "."        # Site source root (relative to the config file)
//! output = "public"   # Build output directory (relative to the config file)
//! safe = false        # Disallow processors that run embedded commands
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Site source root; asset sources resolve against it.
    pub source: PathBuf,

    /// Build output directory.
    pub output: PathBuf,

    /// Safe mode.
    pub safe: bool,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            source: ".".into(),
            output: "public".into(),
            safe: false,
        }
    }
}
