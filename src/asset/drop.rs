//! Template payload: one [`AssetDrop`] per file visible to templates.
//!
//! Files are keyed by their path relative to the search path they live in.
//! Anything with a `_`-prefixed component (`_partials/x.css`, `_base.js`)
//! is private and left out.

use std::collections::BTreeMap;
use std::path::{Component, Path};
use std::sync::Arc;

use serde::Serialize;

use super::glob::files_under;
use super::search::SearchPaths;
use crate::utils::path::{join_url, to_slash};

/// Host values every drop can reach.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HostContext {
    /// Absolute site URL, if configured.
    pub url: Option<String>,
    /// Asset URL prefix (`/assets`).
    pub destination: String,
}

/// One asset as seen from a template.
#[derive(Debug, Clone, Serialize)]
pub struct AssetDrop {
    pub path: String,
    pub url: String,
    pub extname: String,
    pub basename: String,
    #[serde(skip)]
    pub host: Arc<HostContext>,
}

impl AssetDrop {
    pub fn new(path: String, host: Arc<HostContext>) -> Self {
        let p = Path::new(&path);
        let extname = p
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let basename = p
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let url = join_url(&[host.url.as_deref().unwrap_or(""), &host.destination, &path]);
        Self {
            path,
            url,
            extname,
            basename,
            host,
        }
    }
}

/// Whether any component of `rel` starts with `_`.
fn is_private(rel: &Path) -> bool {
    rel.components().any(|c| match c {
        Component::Normal(s) => s.to_string_lossy().starts_with('_'),
        _ => false,
    })
}

/// Build the payload from every file under `paths`.
pub fn build_payload(paths: &SearchPaths, host: &Arc<HostContext>) -> BTreeMap<String, AssetDrop> {
    let mut payload = BTreeMap::new();
    for base in paths {
        for file in files_under(base) {
            let Some((_, rel)) = paths.strip(&file) else {
                continue;
            };
            if is_private(rel) {
                continue;
            }
            let key = to_slash(rel);
            payload
                .entry(key.clone())
                .or_insert_with(|| AssetDrop::new(key, Arc::clone(host)));
        }
    }
    payload
}
