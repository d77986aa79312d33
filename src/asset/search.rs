//! Search paths: the ordered set of asset source directories.
//!
//! ```text
//! sources = ["_assets/js", "../shared", "assets/js"]
//!              │              │            │
//!              ▼              ▼            ▼
//!        /site/_assets/js   skipped    /site/assets/js
//!                        (outside cwd)
//! ```
//!
//! Later entries win when the same logical path exists in several
//! directories.

use std::path::{Path, PathBuf};

use crate::debug;
use crate::utils::path::{is_within, normalize_path};

/// Ordered, duplicate-free list of absolute source directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    paths: Vec<PathBuf>,
}

impl SearchPaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` unless already present. Returns whether it was added.
    pub fn push(&mut self, path: PathBuf) -> bool {
        if self.paths.contains(&path) {
            return false;
        }
        self.paths.push(path);
        true
    }

    /// Paths in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    /// Paths in resolution order (last registered first).
    pub fn by_priority(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// Split `file` into its search path and the path relative to it.
    ///
    /// When search paths nest, the longest matching one is used.
    pub fn strip<'a>(&'a self, file: &'a Path) -> Option<(&'a Path, &'a Path)> {
        self.paths
            .iter()
            .filter_map(|base| file.strip_prefix(base).ok().map(|rel| (base.as_path(), rel)))
            .max_by_key(|(base, _)| base.components().count())
    }
}

impl<'a> IntoIterator for &'a SearchPaths {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

// ============================================================================
// Registration
// ============================================================================

/// Register configured `sources` (relative to `root`) into `paths`.
///
/// Sources resolving outside `cwd` are skipped. Registering the same
/// source twice has no effect. Returns the number of paths added.
pub fn register_sources(
    paths: &mut SearchPaths,
    sources: &[PathBuf],
    root: &Path,
    cwd: &Path,
) -> usize {
    let mut added = 0;
    for source in sources {
        let abs = normalize_path(&root.join(source));
        if !is_within(&abs, cwd) {
            debug!("env"; "skipping source outside working tree: {}", abs.display());
            continue;
        }
        if paths.push(abs) {
            added += 1;
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = normalize_path(dir.path());
        (dir, root)
    }

    #[test]
    fn test_register_in_order() {
        let (_dir, root) = setup();
        let mut paths = SearchPaths::new();
        let sources = vec![PathBuf::from("_assets/js"), PathBuf::from("assets/css")];

        assert_eq!(register_sources(&mut paths, &sources, &root, &root), 2);
        let got: Vec<_> = paths.iter().cloned().collect();
        assert_eq!(got, vec![root.join("_assets/js"), root.join("assets/css")]);
    }

    #[test]
    fn test_register_is_idempotent() {
        let (_dir, root) = setup();
        let mut paths = SearchPaths::new();
        let sources = vec![PathBuf::from("assets"), PathBuf::from("./assets")];

        register_sources(&mut paths, &sources, &root, &root);
        register_sources(&mut paths, &sources, &root, &root);
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_outside_cwd_is_skipped() {
        let (_dir, root) = setup();
        let cwd = root.join("site");
        fs::create_dir_all(&cwd).unwrap();

        let mut paths = SearchPaths::new();
        let sources = vec![
            PathBuf::from("../outside"),
            PathBuf::from("../../etc"),
            PathBuf::from("assets"),
        ];
        assert_eq!(register_sources(&mut paths, &sources, &cwd, &cwd), 1);
        assert_eq!(paths.iter().next().unwrap(), &cwd.join("assets"));
    }

    #[test]
    fn test_cwd_itself_is_allowed() {
        let (_dir, root) = setup();
        let mut paths = SearchPaths::new();
        register_sources(&mut paths, &[PathBuf::from(".")], &root, &root);
        assert!(paths.contains(&root));
    }

    #[test]
    fn test_strip_prefers_longest() {
        let mut paths = SearchPaths::new();
        paths.push(PathBuf::from("/site/assets"));
        paths.push(PathBuf::from("/site/assets/js"));

        let file = Path::new("/site/assets/js/app.js");
        let (base, rel) = paths.strip(file).unwrap();
        assert_eq!(base, Path::new("/site/assets/js"));
        assert_eq!(rel, Path::new("app.js"));

        assert!(paths.strip(Path::new("/elsewhere/x.js")).is_none());
    }

    #[test]
    fn test_by_priority_is_reversed() {
        let mut paths = SearchPaths::new();
        paths.push(PathBuf::from("/a"));
        paths.push(PathBuf::from("/b"));
        let order: Vec<_> = paths.by_priority().collect();
        assert_eq!(order, vec![&PathBuf::from("/b"), &PathBuf::from("/a")]);
    }
}
