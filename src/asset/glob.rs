//! Glob expansion over the search paths.
//!
//! `*` and `?` stay within one path segment, `**` crosses segments.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use jwalk::WalkDir;
use rustc_hash::FxHashMap;

use super::error::AssetError;
use super::search::SearchPaths;
use crate::config::FieldPath;
use crate::utils::path::to_slash;

/// Whether `target` is a glob pattern rather than a literal path.
#[inline]
pub fn is_glob(target: &str) -> bool {
    target.contains(['*', '?', '['])
}

/// All regular files under `dir`, sorted. Missing directories yield nothing.
pub fn files_under(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return vec![];
    }
    let mut files: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .collect();
    files.sort();
    files
}

/// A single glob match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobMatch {
    /// Path relative to its search path, `/`-separated.
    pub logical: String,
    /// Absolute file path.
    pub path: PathBuf,
}

/// Expand `pattern` against every search path.
///
/// Search paths are visited in registration order and files in lexical
/// order. A logical path found under more than one search path is reported
/// once, at its first position, pointing at the file from the last
/// registered directory that has it. `processed` lists extensions
/// of source files that compile to their stem (`app.js.tmpl` → `app.js`);
/// such files match under their compiled name.
pub fn expand(
    pattern: &str,
    paths: &SearchPaths,
    processed: &[&str],
    field: FieldPath,
) -> Result<Vec<GlobMatch>, AssetError> {
    let matcher = compile(pattern, field)?;
    let mut seen: FxHashMap<String, usize> = FxHashMap::default();
    let mut matches: Vec<GlobMatch> = Vec::new();

    for base in paths {
        for file in files_under(base) {
            let Ok(rel) = file.strip_prefix(base) else {
                continue;
            };
            let Some(logical) = logical_name(&to_slash(rel), processed) else {
                continue;
            };
            if !matcher.is_match(&logical) {
                continue;
            }
            match seen.get(&logical) {
                // Later search paths shadow earlier ones.
                Some(&i) => matches[i].path = file,
                None => {
                    seen.insert(logical.clone(), matches.len());
                    matches.push(GlobMatch {
                        logical,
                        path: file,
                    });
                }
            }
        }
    }
    Ok(matches)
}

fn compile(pattern: &str, field: FieldPath) -> Result<GlobMatcher, AssetError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|g| g.compile_matcher())
        .map_err(|e| AssetError::Configuration {
            field,
            message: format!("invalid glob `{pattern}`: {e}"),
        })
}

/// Compiled name of a relative source path.
///
/// `None` when stripping a processed extension would leave nothing.
fn logical_name(rel: &str, processed: &[&str]) -> Option<String> {
    for ext in processed {
        if let Some(stem) = rel.strip_suffix(ext).and_then(|s| s.strip_suffix('.')) {
            if stem.is_empty() || stem.ends_with('/') {
                return None;
            }
            return Some(stem.to_owned());
        }
    }
    Some(rel.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssetsConfig;
    use crate::utils::path::normalize_path;
    use std::fs;
    use tempfile::TempDir;

    const FIELD: FieldPath = AssetsConfig::PRECOMPILE;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    fn logicals(matches: &[GlobMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.logical.as_str()).collect()
    }

    #[test]
    fn test_is_glob() {
        assert!(is_glob("images/*.png"));
        assert!(is_glob("icon-?.svg"));
        assert!(is_glob("img/[ab].png"));
        assert!(!is_glob("js/app.js"));
    }

    #[test]
    fn test_star_stays_in_segment() {
        let dir = TempDir::new().unwrap();
        let root = normalize_path(dir.path());
        touch(&root, "a/images/x.png");
        touch(&root, "a/images/y.png");
        touch(&root, "a/images/nested/z.png");
        touch(&root, "a/images/readme.txt");

        let mut paths = SearchPaths::new();
        paths.push(root.join("a"));

        let single = expand("images/*.png", &paths, &[], FIELD).unwrap();
        assert_eq!(logicals(&single), vec!["images/x.png", "images/y.png"]);

        let deep = expand("images/**/*.png", &paths, &[], FIELD).unwrap();
        assert_eq!(
            logicals(&deep),
            vec!["images/nested/z.png", "images/x.png", "images/y.png"]
        );
    }

    #[test]
    fn test_last_search_path_shadows_duplicates() {
        let dir = TempDir::new().unwrap();
        let root = normalize_path(dir.path());
        touch(&root, "a/app.js");
        touch(&root, "a/zed.js");
        touch(&root, "b/app.js");
        touch(&root, "b/lib.js");

        let mut paths = SearchPaths::new();
        paths.push(root.join("a"));
        paths.push(root.join("b"));

        let matches = expand("*.js", &paths, &[], FIELD).unwrap();
        assert_eq!(logicals(&matches), vec!["app.js", "zed.js", "lib.js"]);
        assert_eq!(matches[0].path, root.join("b/app.js"));
        assert_eq!(matches[1].path, root.join("a/zed.js"));
    }

    #[test]
    fn test_no_match_and_missing_dir() {
        let mut paths = SearchPaths::new();
        paths.push(PathBuf::from("/definitely/not/here"));
        assert!(expand("*.css", &paths, &[], FIELD).unwrap().is_empty());
    }

    #[test]
    fn test_processed_extension_matches_compiled_name() {
        let dir = TempDir::new().unwrap();
        let root = normalize_path(dir.path());
        touch(&root, "js/build.js.tmpl");

        let mut paths = SearchPaths::new();
        paths.push(root.join("js"));

        let matches = expand("*.js", &paths, &["tmpl"], FIELD).unwrap();
        assert_eq!(logicals(&matches), vec!["build.js"]);
        assert!(expand("*.js", &paths, &[], FIELD).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_pattern_is_configuration_error() {
        let paths = SearchPaths::new();
        let err = expand("img/[a.png", &paths, &[], FIELD).unwrap_err();
        assert!(matches!(err, AssetError::Configuration { .. }));
    }
}
