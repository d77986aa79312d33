//! `[assets]` section configuration.
//!
//! Resolves the raw `[assets]` table into [`AssetsConfig`]. Resolution never
//! fails: missing keys take their defaults, a value of the wrong type is
//! reported and replaced by the default, and unknown keys are kept in
//! [`AssetsConfig::extra`] without being interpreted.
//!
//! # Example
//!
//! ```toml
//! [assets]
//! compression = true                 # minify JS/CSS while compiling
//! gzip = false                       # ask the writer for .gz siblings
//! destination = "/assets"            # URL prefix / output subdirectory
//! sources = ["_assets/js", "_assets/css"]
//! precompile = ["app.js", "images/*.png"]
//! raw_precompile = [
//!     "fonts/*.woff2",                   # → output/assets/fonts/x.woff2
//!     { src = "images/*.svg", dst = "img" }, # → output/img/x.svg
//! ]
//!
//! [assets.caching]
//! enabled = true
//! type = "file"                      # memory | file
//! path = ".tola/cache/assets"
//! ```

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::FieldPath;
use crate::log;

// ============================================================================
// Main Config
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "toml::Table")]
pub struct AssetsConfig {
    /// Whether gzipped siblings of compiled assets are wanted.
    pub gzip: bool,

    /// Minify JavaScript and CSS while compiling.
    pub compression: bool,

    /// URL prefix for compiled assets, also their output subdirectory.
    pub destination: String,

    /// Cache backend selection.
    pub caching: CachingConfig,

    /// Source directories (relative to the site source root).
    pub sources: Vec<PathBuf>,

    /// Logical paths or glob patterns compiled during initialization.
    pub precompile: Vec<String>,

    /// Files copied verbatim instead of compiled.
    pub raw_precompile: Vec<RawEntry>,

    /// Unrecognized keys, preserved untouched.
    #[serde(flatten)]
    pub extra: toml::Table,
}

impl AssetsConfig {
    pub const GZIP: FieldPath = FieldPath::new("assets.gzip");
    pub const COMPRESSION: FieldPath = FieldPath::new("assets.compression");
    pub const DESTINATION: FieldPath = FieldPath::new("assets.destination");
    pub const CACHING: FieldPath = FieldPath::new("assets.caching");
    pub const CACHING_ENABLED: FieldPath = FieldPath::new("assets.caching.enabled");
    pub const CACHING_TYPE: FieldPath = FieldPath::new("assets.caching.type");
    pub const CACHING_PATH: FieldPath = FieldPath::new("assets.caching.path");
    pub const SOURCES: FieldPath = FieldPath::new("assets.sources");
    pub const PRECOMPILE: FieldPath = FieldPath::new("assets.precompile");
    pub const RAW_PRECOMPILE: FieldPath = FieldPath::new("assets.raw_precompile");
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            gzip: false,
            compression: true,
            destination: "/assets".into(),
            caching: CachingConfig::default(),
            sources: [
                "_assets/css",
                "_assets/fonts",
                "_assets/images",
                "_assets/js",
                "assets/css",
                "assets/fonts",
                "assets/images",
                "assets/js",
            ]
            .into_iter()
            .map(PathBuf::from)
            .collect(),
            precompile: vec![],
            raw_precompile: vec![],
            extra: toml::Table::new(),
        }
    }
}

impl From<toml::Table> for AssetsConfig {
    fn from(raw: toml::Table) -> Self {
        Self::resolve(raw)
    }
}

impl AssetsConfig {
    /// Build a config from a raw `[assets]` table, filling in defaults.
    pub fn resolve(mut raw: toml::Table) -> Self {
        let mut config = Self::default();

        take(&mut raw, "gzip", Self::GZIP, &mut config.gzip);
        take(&mut raw, "compression", Self::COMPRESSION, &mut config.compression);
        take(&mut raw, "destination", Self::DESTINATION, &mut config.destination);
        take(&mut raw, "sources", Self::SOURCES, &mut config.sources);
        take(&mut raw, "precompile", Self::PRECOMPILE, &mut config.precompile);
        take(
            &mut raw,
            "raw_precompile",
            Self::RAW_PRECOMPILE,
            &mut config.raw_precompile,
        );

        match raw.remove("caching") {
            Some(toml::Value::Table(table)) => config.caching = CachingConfig::resolve(table),
            Some(_) => warn_type(Self::CACHING),
            None => {}
        }

        config.extra = raw;
        config
    }

    /// Destination prefix without leading or trailing slashes (`assets`).
    pub fn destination_dir(&self) -> &str {
        self.destination.trim_matches('/')
    }
}

/// Move `key` out of `table` into `slot` if it deserializes as `T`.
fn take<T: DeserializeOwned>(table: &mut toml::Table, key: &str, field: FieldPath, slot: &mut T) {
    let Some(value) = table.remove(key) else {
        return;
    };
    match value.try_into::<T>() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn_type(field),
    }
}

fn warn_type(field: FieldPath) {
    log!("warning"; "{} has an unexpected type, using the default", field.as_str());
}

// ============================================================================
// Caching
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachingConfig {
    pub enabled: bool,

    /// Backend name. Kept verbatim; checked when the cache is built.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Cache directory for the `file` backend.
    pub path: PathBuf,
}

impl Default for CachingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: Some("file".into()),
            path: PathBuf::from(".tola/cache/assets"),
        }
    }
}

impl CachingConfig {
    fn resolve(mut raw: toml::Table) -> Self {
        let mut config = Self::default();
        take(&mut raw, "enabled", AssetsConfig::CACHING_ENABLED, &mut config.enabled);
        take(&mut raw, "path", AssetsConfig::CACHING_PATH, &mut config.path);

        // Any value is accepted here; an unsupported one surfaces once the
        // cache is actually requested.
        if let Some(value) = raw.remove("type") {
            config.kind = Some(match value {
                toml::Value::String(s) => s,
                other => other.to_string(),
            });
        }
        config
    }
}

// ============================================================================
// Raw Entry
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEntry {
    /// Logical path or glob, copied under the asset destination.
    Simple(String),
    /// Source pattern with an explicit destination (relative to output).
    Full {
        src: String,
        #[serde(default)]
        dst: Option<PathBuf>,
    },
}

impl RawEntry {
    /// Source logical path or glob.
    pub fn source(&self) -> &str {
        match self {
            Self::Simple(src) | Self::Full { src, .. } => src,
        }
    }

    /// Explicit destination, if configured.
    pub fn destination(&self) -> Option<&Path> {
        match self {
            Self::Simple(_) => None,
            Self::Full { dst, .. } => dst.as_deref(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
