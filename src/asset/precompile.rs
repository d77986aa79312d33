//! Precompile pass over `assets.precompile`.
//!
//! Literal targets compile one at a time. A glob target expands against the
//! search paths and its matches compile in parallel; results are recorded
//! in expansion order.

use rayon::prelude::*;

use super::compile::{Compile, CompileContext, CompiledAsset};
use super::error::AssetError;
use super::glob::{self, is_glob};
use super::manifest::{Manifest, ManifestEntry};
use crate::config::AssetsConfig;
use crate::debug;

/// Compile every target and record the results in `manifest`.
///
/// Returns the entries added by this run, in order. `manifest.json` is
/// rewritten when at least one target was given.
pub fn run(
    targets: &[String],
    compiler: &dyn Compile,
    ctx: &CompileContext<'_>,
    manifest: &mut Manifest,
) -> Result<Vec<ManifestEntry>, AssetError> {
    let mut entries = Vec::new();
    for target in targets {
        for asset in compile_target(target, compiler, ctx)? {
            entries.push(manifest.record(&asset)?.clone());
        }
    }
    if !targets.is_empty() {
        manifest.write()?;
    }
    Ok(entries)
}

fn compile_target(
    target: &str,
    compiler: &dyn Compile,
    ctx: &CompileContext<'_>,
) -> Result<Vec<CompiledAsset>, AssetError> {
    if !is_glob(target) {
        debug!("precompile"; "{}", target);
        return Ok(vec![compiler.compile(target, ctx)?]);
    }

    let exts = ctx.processors.extensions();
    let matches = glob::expand(target, ctx.search_paths, &exts, AssetsConfig::PRECOMPILE)?;
    debug!("precompile"; "{} → {} match(es)", target, matches.len());

    matches
        .par_iter()
        .map(|m| compiler.compile(&m.logical, ctx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::compile::Compiler;
    use crate::asset::process::ProcessorRegistry;
    use crate::asset::search::SearchPaths;
    use crate::cache::{Cache, NullStore};
    use crate::utils::path::normalize_path;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        root: PathBuf,
        paths: SearchPaths,
        processors: ProcessorRegistry,
        cache: Cache,
    }

    impl Fixture {
        fn new(files: &[&str]) -> Self {
            let dir = TempDir::new().unwrap();
            let root = normalize_path(dir.path());
            for rel in files {
                let path = root.join("src").join(rel);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(path, rel).unwrap();
            }
            let mut paths = SearchPaths::new();
            paths.push(root.join("src"));
            Self {
                _dir: dir,
                root,
                paths,
                processors: ProcessorRegistry::default(),
                cache: Cache::new(Box::new(NullStore)),
            }
        }

        fn run(&self, targets: &[&str]) -> Result<(Vec<ManifestEntry>, Manifest), AssetError> {
            let ctx = CompileContext {
                search_paths: &self.paths,
                processors: &self.processors,
                cache: &self.cache,
                root: &self.root,
                compress: false,
            };
            let mut manifest = Manifest::new(self.root.join("out"), false);
            let targets: Vec<String> = targets.iter().map(|s| s.to_string()).collect();
            let entries = run(&targets, &Compiler, &ctx, &mut manifest)?;
            Ok((entries, manifest))
        }
    }

    fn logicals(entries: &[ManifestEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.logical_path.as_str()).collect()
    }

    #[test]
    fn test_literal_and_glob_order() {
        let fx = Fixture::new(&["app.js", "images/b.png", "images/a.png", "images/c.gif"]);
        let (entries, manifest) = fx.run(&["app.js", "images/*.png"]).unwrap();

        assert_eq!(logicals(&entries), vec!["app.js", "images/a.png", "images/b.png"]);
        assert_eq!(manifest.len(), 3);
        assert!(fx.root.join("out/manifest.json").is_file());
    }

    #[test]
    fn test_glob_without_matches_is_noop() {
        let fx = Fixture::new(&["app.js"]);
        let (entries, _) = fx.run(&["*.css"]).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_missing_literal_fails() {
        let fx = Fixture::new(&["app.js"]);
        let err = fx.run(&["missing.js"]).unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)));
    }

    #[test]
    fn test_no_targets_writes_nothing() {
        let fx = Fixture::new(&["app.js"]);
        let (entries, _) = fx.run(&[]).unwrap();
        assert!(entries.is_empty());
        assert!(!fx.root.join("out/manifest.json").exists());
    }

    #[test]
    fn test_output_is_deterministic() {
        let files: Vec<String> = (0..32).map(|i| format!("js/m{i:02}.js")).collect();
        let refs: Vec<&str> = files.iter().map(String::as_str).collect();
        let fx = Fixture::new(&refs);

        let (first, _) = fx.run(&["js/*.js"]).unwrap();
        let (second, _) = fx.run(&["js/*.js"]).unwrap();
        assert_eq!(first, second);
        assert_eq!(logicals(&first), refs);
    }
}
