//! Raw assets: files copied verbatim instead of compiled.
//!
//! ```toml
//! raw_precompile = [
//!     "fonts/*.woff2",                      # → <output>/assets/fonts/x.woff2
//!     { src = "images/*.svg", dst = "img" }, # → <output>/img/x.svg
//! ]
//! ```
//!
//! Simple entries always land at `<output>/<destination>/<logical>`. An
//! explicit `dst` with an extension is a file target; without one it is a
//! directory the source is copied into under its own name.

use std::fs;
use std::path::{Path, PathBuf};

use super::compile::is_relative_logical;
use super::error::AssetError;
use super::glob::{self, is_glob};
use super::search::SearchPaths;
use crate::config::{AssetsConfig, RawEntry};
use crate::debug;
use crate::utils::path::{clean_path, is_within};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCopy {
    pub src: PathBuf,
    pub dst: PathBuf,
    /// `dst` is a directory the source is copied into.
    pub into_dir: bool,
}

impl RawCopy {
    /// Final file path the source ends up at.
    pub fn target(&self) -> PathBuf {
        match (self.into_dir, self.src.file_name()) {
            (true, Some(name)) => self.dst.join(name),
            _ => self.dst.clone(),
        }
    }
}

/// Turn `raw_precompile` entries into concrete copies.
///
/// `destination` is the asset prefix directory under `output` used for
/// entries without an explicit `dst`.
pub fn expand(
    entries: &[RawEntry],
    paths: &SearchPaths,
    output: &Path,
    destination: &str,
) -> Result<Vec<RawCopy>, AssetError> {
    let mut copies = Vec::new();
    for entry in entries {
        let sources = sources_for(entry.source(), paths)?;
        match entry.destination() {
            Some(dst) => {
                let into_dir = dst.extension().is_none();
                let dst = jailed(output, dst)?;
                copies.extend(sources.into_iter().map(|(_, src)| RawCopy {
                    src,
                    dst: dst.clone(),
                    into_dir,
                }));
            }
            None => {
                let base = output.join(destination);
                copies.extend(sources.into_iter().map(|(logical, src)| RawCopy {
                    src,
                    dst: base.join(&logical),
                    into_dir: false,
                }));
            }
        }
    }
    Ok(copies)
}

/// `(logical, absolute)` pairs for one raw source pattern.
fn sources_for(pattern: &str, paths: &SearchPaths) -> Result<Vec<(String, PathBuf)>, AssetError> {
    if is_glob(pattern) {
        let matches = glob::expand(pattern, paths, &[], AssetsConfig::RAW_PRECOMPILE)?;
        return Ok(matches.into_iter().map(|m| (m.logical, m.path)).collect());
    }
    if !is_relative_logical(pattern) {
        return Err(AssetError::NotFound(pattern.to_owned()));
    }
    paths
        .by_priority()
        .map(|base| base.join(pattern))
        .find(|p| p.is_file())
        .map(|p| vec![(pattern.to_owned(), p)])
        .ok_or_else(|| AssetError::NotFound(pattern.to_owned()))
}

fn jailed(output: &Path, dst: &Path) -> Result<PathBuf, AssetError> {
    let path = clean_path(&output.join(dst));
    if dst.is_absolute() || !is_within(&path, output) {
        return Err(AssetError::Configuration {
            field: AssetsConfig::RAW_PRECOMPILE,
            message: format!("destination `{}` leaves the output directory", dst.display()),
        });
    }
    Ok(path)
}

/// Perform `copies`, creating directories as needed. Existing files are
/// overwritten.
pub fn copy_raw(copies: &[RawCopy]) -> Result<(), AssetError> {
    for copy in copies {
        let target = copy.target();
        let dir = if copy.into_dir {
            Some(copy.dst.as_path())
        } else {
            target.parent()
        };
        if let Some(dir) = dir {
            fs::create_dir_all(dir).map_err(|e| AssetError::io(dir, e))?;
        }
        fs::copy(&copy.src, &target).map_err(|e| AssetError::io(&copy.src, e))?;
        debug!("raw"; "{} → {}", copy.src.display(), target.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::path::normalize_path;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        root: PathBuf,
        paths: SearchPaths,
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
            }
        }

        fn output(&self) -> PathBuf {
            self.root.join("out")
        }
    }

    fn entries(toml_src: &str) -> Vec<RawEntry> {
        AssetsConfig::resolve(toml::from_str(toml_src).unwrap()).raw_precompile
    }

    #[test]
    fn test_simple_entry_keeps_logical_path() {
        let fx = Fixture::new(&["fonts/a.woff2", "fonts/b.woff2"]);
        let copies = expand(
            &entries(r#"raw_precompile = ["fonts/*.woff2"]"#),
            &fx.paths,
            &fx.output(),
            "assets",
        )
        .unwrap();
        assert_eq!(copies.len(), 2);
        assert_eq!(copies[0].dst, fx.output().join("assets/fonts/a.woff2"));

        copy_raw(&copies).unwrap();
        assert!(fx.output().join("assets/fonts/b.woff2").is_file());
    }

    #[test]
    fn test_simple_entry_under_dotted_directory() {
        let fx = Fixture::new(&["v1.2/LICENSE", "v1.2/notes.txt"]);
        let copies = expand(
            &entries(r#"raw_precompile = ["v1.2/*"]"#),
            &fx.paths,
            &fx.output(),
            "static.v2",
        )
        .unwrap();
        copy_raw(&copies).unwrap();

        let dir = fx.output().join("static.v2/v1.2");
        assert!(dir.is_dir());
        assert_eq!(fs::read_to_string(dir.join("LICENSE")).unwrap(), "v1.2/LICENSE");
        assert!(dir.join("notes.txt").is_file());
    }

    #[test]
    fn test_glob_entry_prefers_later_search_path() {
        let fx = Fixture::new(&["app.js"]);
        let vendor = fx.root.join("vendor");
        fs::create_dir_all(&vendor).unwrap();
        fs::write(vendor.join("app.js"), "vendor").unwrap();

        let mut paths = SearchPaths::new();
        paths.push(vendor);
        paths.push(fx.root.join("src"));

        for pattern in ["app.js", "*.js"] {
            let copies = expand(
                &entries(&format!("raw_precompile = [\"{pattern}\"]")),
                &paths,
                &fx.output(),
                "assets",
            )
            .unwrap();
            assert_eq!(copies[0].src, fx.root.join("src/app.js"), "{pattern}");
        }
    }

    #[test]
    fn test_directory_target() {
        let fx = Fixture::new(&["images/a.png", "images/b.png"]);
        let copies = expand(
            &entries(r#"raw_precompile = [{ src = "images/*.png", dst = "dist/img" }]"#),
            &fx.paths,
            &fx.output(),
            "assets",
        )
        .unwrap();
        copy_raw(&copies).unwrap();

        let img = fx.output().join("dist/img");
        assert!(img.is_dir());
        assert_eq!(fs::read_to_string(img.join("a.png")).unwrap(), "images/a.png");
        assert!(img.join("b.png").is_file());
    }

    #[test]
    fn test_file_target_overwrites() {
        let fx = Fixture::new(&["robots.txt"]);
        let out = fx.output();
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("robots.txt"), "old").unwrap();

        let copies = expand(
            &entries(r#"raw_precompile = [{ src = "robots.txt", dst = "robots.txt" }]"#),
            &fx.paths,
            &out,
            "assets",
        )
        .unwrap();
        copy_raw(&copies).unwrap();
        assert_eq!(fs::read_to_string(out.join("robots.txt")).unwrap(), "robots.txt");
    }

    #[test]
    fn test_missing_literal_is_not_found() {
        let fx = Fixture::new(&[]);
        let err = expand(
            &entries(r#"raw_precompile = ["nope.txt"]"#),
            &fx.paths,
            &fx.output(),
            "assets",
        )
        .unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)));
    }

    #[test]
    fn test_missing_source_is_io_error() {
        let fx = Fixture::new(&[]);
        let copies = vec![RawCopy {
            src: fx.root.join("gone.txt"),
            dst: fx.output().join("x"),
            into_dir: false,
        }];
        assert!(matches!(copy_raw(&copies), Err(AssetError::Io(..))));
    }

    #[test]
    fn test_destination_cannot_escape_output() {
        let fx = Fixture::new(&["a.txt"]);
        let err = expand(
            &entries(r#"raw_precompile = [{ src = "a.txt", dst = "../elsewhere" }]"#),
            &fx.paths,
            &fx.output(),
            "assets",
        )
        .unwrap_err();
        assert!(matches!(err, AssetError::Configuration { .. }));
    }
}
