//! Site configuration management for `tola-assets.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── assets     # [assets] (asset pipeline options)
//! │   ├── build      # [build]
//! │   └── site       # [site]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError
//! │   └── field      # FieldPath
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! The `[assets]` table is resolved leniently (see [`AssetsConfig::resolve`]);
//! the rest of the file is plain `serde`.

pub mod section;
pub mod types;
mod util;

pub(crate) use util::expand_home;
use util::find_config_file;

pub use section::{AssetsConfig, BuildSectionConfig, CachingConfig, RawEntry, SiteSectionConfig};
pub use types::{ConfigError, FieldPath};

use crate::cli::{Cli, EnvArgs};
use crate::log;
use crate::utils::path::normalize_path;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing tola-assets.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Working directory asset sources must stay inside (internal use only)
    #[serde(skip)]
    pub cwd: PathBuf,

    /// Site settings
    #[serde(default)]
    pub site: SiteSectionConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildSectionConfig,

    /// Asset pipeline settings
    #[serde(default)]
    pub assets: AssetsConfig,
}

impl SiteConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd to find the config file. The project root is
    /// the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let config_path = find_config_file(&cli.config)
            .ok_or_else(|| ConfigError::NotFound(cwd.join(&cli.config)))?;

        let mut config = Self::from_path(&config_path)?;
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        config.config_path = normalize_path(&config_path);
        config.finalize(&root, &cwd);
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    ///
    /// Unknown keys inside `[assets]` are not reported: the asset resolver
    /// keeps them in `AssetsConfig::extra`.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::from)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Set the root and working directories, normalized to absolute form.
    pub fn finalize(&mut self, root: &Path, cwd: &Path) {
        self.root = normalize_path(root);
        self.cwd = normalize_path(cwd);
    }

    /// Apply per-command overrides from the CLI.
    pub fn apply_env_args(&mut self, args: &EnvArgs) {
        crate::logger::set_verbose(args.verbose);
        if args.safe {
            self.build.safe = true;
        }
        if let Some(output) = &args.output {
            self.build.output = output.clone();
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Site source root (absolute).
    pub fn source_dir(&self) -> PathBuf {
        normalize_path(&self.root_join(&self.build.source))
    }

    /// Build output directory (absolute).
    pub fn output_dir(&self) -> PathBuf {
        normalize_path(&self.root_join(&self.build.output))
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Config rooted at `root`, with `root` also acting as the working directory.
#[cfg(test)]
pub fn test_site_config(root: &Path, assets: &str) -> SiteConfig {
    let mut config = SiteConfig {
        assets: AssetsConfig::resolve(toml::from_str(assets).unwrap()),
        ..SiteConfig::default()
    };
    config.finalize(root, root);
    config
}

// ============================================================================
// tests
// ============================================================================
