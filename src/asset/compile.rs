//! Compiling one logical asset.
//!
//! ```text
//! "js/app.js"
//!     │ resolve (last search path first; app.js, then app.js.<processor ext>)
//!     ▼
//! /site/_assets/js/app.js.tmpl
//!     │ process (template) ─┐
//!     │ minify (compress)  ─┴─ cached by (logical, source digest, flags)
//!     ▼
//! CompiledAsset { body, digest }
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use super::error::AssetError;
use super::minify::{is_minifiable, minify};
use super::process::{ProcessContext, Processor, ProcessorRegistry};
use super::search::SearchPaths;
use crate::cache::Cache;
use crate::utils::hash;

/// Everything a compile needs from the environment.
#[derive(Clone, Copy)]
pub struct CompileContext<'a> {
    pub search_paths: &'a SearchPaths,
    pub processors: &'a ProcessorRegistry,
    pub cache: &'a Cache,
    /// Site root, handed to processors.
    pub root: &'a Path,
    /// Minify JS and CSS.
    pub compress: bool,
}

#[derive(Debug, Clone)]
pub struct CompiledAsset {
    pub logical: String,
    /// Source file the asset was built from.
    pub source: PathBuf,
    pub body: Vec<u8>,
    /// blake3 hex digest of `body`.
    pub digest: String,
}

/// The compilation engine seam.
pub trait Compile: Send + Sync {
    fn compile(&self, logical: &str, ctx: &CompileContext<'_>) -> Result<CompiledAsset, AssetError>;
}

/// Default engine: resolve, process, minify.
#[derive(Debug, Default, Clone, Copy)]
pub struct Compiler;

impl Compile for Compiler {
    fn compile(&self, logical: &str, ctx: &CompileContext<'_>) -> Result<CompiledAsset, AssetError> {
        let (source, processor) =
            resolve(logical, ctx).ok_or_else(|| AssetError::NotFound(logical.to_owned()))?;
        let raw = fs::read(&source).map_err(|e| AssetError::io(&source, e))?;

        let ext = extension(logical);
        let minifying = ctx.compress && is_minifiable(ext);

        let body = if processor.is_none() && !minifying {
            raw
        } else {
            let source_digest = hash::digest(&raw);
            let key = hash::key(&[
                logical,
                &source_digest,
                processor.as_ref().map_or("", |p| p.name()),
                if minifying { "min" } else { "" },
            ]);
            ctx.cache.fetch(&key, || {
                transform(&raw, &source, ext, processor.as_deref(), minifying, ctx)
            })?
        };

        Ok(CompiledAsset {
            logical: logical.to_owned(),
            digest: hash::digest(&body),
            source,
            body,
        })
    }
}

fn transform(
    raw: &[u8],
    source: &Path,
    ext: &str,
    processor: Option<&dyn Processor>,
    minifying: bool,
    ctx: &CompileContext<'_>,
) -> Result<Vec<u8>, AssetError> {
    let text = std::str::from_utf8(raw).map_err(|e| AssetError::compile(source, e))?;

    let mut text = match processor {
        Some(p) => {
            let pctx = ProcessContext {
                root: ctx.root,
                path: source,
            };
            p.process(text, &pctx)
                .map_err(|e| AssetError::compile(source, e))?
        }
        None => text.to_owned(),
    };

    if minifying
        && let Some(min) = minify(ext, &text).map_err(|e| AssetError::compile(source, e))?
    {
        text = min;
    }
    Ok(text.into_bytes())
}

/// Locate the source file for `logical`.
///
/// Search paths are tried last-registered first. Within one search path the
/// plain file wins over processed variants.
pub fn resolve(
    logical: &str,
    ctx: &CompileContext<'_>,
) -> Option<(PathBuf, Option<Arc<dyn Processor>>)> {
    if !is_relative_logical(logical) {
        return None;
    }
    for base in ctx.search_paths.by_priority() {
        let plain = base.join(logical);
        if plain.is_file() {
            return Some((plain, None));
        }
        for processor in ctx.processors.iter() {
            let candidate = base.join(format!("{logical}.{}", processor.extension()));
            if candidate.is_file() {
                return Some((candidate, Some(Arc::clone(processor))));
            }
        }
    }
    None
}

/// Logical paths never climb out of their search path.
pub(super) fn is_relative_logical(logical: &str) -> bool {
    !logical.is_empty()
        && Path::new(logical)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn extension(logical: &str) -> &str {
    Path::new(logical)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
}
