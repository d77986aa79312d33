//! Output manifest: logical path → fingerprinted output file.
//!
//! ```text
//! public/assets/
//! ├── app-1f3a9c2e.js
//! ├── images/logo-77d0b1aa.png
//! └── manifest.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::compile::CompiledAsset;
use super::error::AssetError;
use crate::utils::hash::fingerprint;
use crate::utils::path::to_slash;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub logical_path: String,
    /// Output path relative to the manifest directory.
    pub digest_path: String,
    pub digest: String,
    pub source: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct Manifest {
    dir: PathBuf,
    entries: Vec<ManifestEntry>,
    gzip: bool,
}

#[derive(Serialize)]
struct ManifestFile<'a> {
    gzip: bool,
    assets: serde_json::Map<String, serde_json::Value>,
    files: &'a [ManifestEntry],
}

impl Manifest {
    pub fn new(dir: impl Into<PathBuf>, gzip: bool) -> Self {
        Self {
            dir: dir.into(),
            entries: vec![],
            gzip,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn gzip(&self) -> bool {
        self.gzip
    }

    /// Entries in the order they were recorded.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Latest entry for `logical`.
    pub fn find(&self, logical: &str) -> Option<&ManifestEntry> {
        self.entries.iter().rev().find(|e| e.logical_path == logical)
    }

    /// Write `asset` under its fingerprinted name and record it.
    pub fn record(&mut self, asset: &CompiledAsset) -> Result<&ManifestEntry, AssetError> {
        let digest_path = digest_name(&asset.logical, fingerprint(&asset.digest));
        let out = self.dir.join(&digest_path);
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).map_err(|e| AssetError::io(parent, e))?;
        }
        fs::write(&out, &asset.body).map_err(|e| AssetError::io(&out, e))?;

        self.entries.push(ManifestEntry {
            logical_path: asset.logical.clone(),
            digest_path,
            digest: asset.digest.clone(),
            source: asset.source.clone(),
            size: asset.body.len() as u64,
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Write `manifest.json` into the manifest directory.
    pub fn write(&self) -> Result<PathBuf, AssetError> {
        let assets = self
            .entries
            .iter()
            .map(|e| {
                let out = serde_json::Value::String(e.digest_path.clone());
                (e.logical_path.clone(), out)
            })
            .collect();
        let file = ManifestFile {
            gzip: self.gzip,
            assets,
            files: &self.entries,
        };

        let path = self.dir.join(MANIFEST_FILE);
        let json = serde_json::to_vec_pretty(&file)
            .map_err(|e| AssetError::io(&path, std::io::Error::other(e)))?;
        fs::create_dir_all(&self.dir).map_err(|e| AssetError::io(&self.dir, e))?;
        fs::write(&path, json).map_err(|e| AssetError::io(&path, e))?;
        Ok(path)
    }
}

/// `js/app.js` + `1f3a9c2e` → `js/app-1f3a9c2e.js`.
pub fn digest_name(logical: &str, fingerprint: &str) -> String {
    let path = Path::new(logical);
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}-{fingerprint}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{fingerprint}"),
    };
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => to_slash(&parent.join(name)),
        _ => name,
    }
}
