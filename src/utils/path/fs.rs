//! Path normalization utilities.
//!
//! Provides consistent path handling across the codebase:
//! - `normalize_path` - file system paths (canonicalize + lexical fallback)
//! - `clean_path` - lexical `.`/`..` resolution without touching the disk
//! - `is_within` - containment check used as the search-path jail

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to joining with the current directory and cleaning
/// the result lexically, so paths that do not exist yet still lose
/// their `..` components.
///
/// # Example
/// ```ignore
/// use crate::utils::path::normalize_path;
/// let abs = normalize_path(Path::new("./_assets/../_assets/js"));
/// ```
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            clean_path(path)
        } else {
            std::env::current_dir()
                .map_or_else(|_| clean_path(path), |cwd| clean_path(&cwd.join(path)))
        }
    })
}

/// Resolve `.` and `..` components lexically.
///
/// `..` at the root is dropped, matching how the OS resolves `/..`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Check whether `path` equals `base` or lives underneath it.
///
/// Both sides are compared component-wise, so `/site-other` is not
/// inside `/site`.
#[inline]
pub fn is_within(path: &Path, base: &Path) -> bool {
    path.starts_with(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_missing_parent_dir() {
        let normalized = normalize_path(Path::new("/nonexistent-root/a/../b"));
        assert_eq!(normalized, PathBuf::from("/nonexistent-root/b"));
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(clean_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(clean_path(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_is_within() {
        let base = Path::new("/site");
        assert!(is_within(Path::new("/site"), base));
        assert!(is_within(Path::new("/site/_assets/js"), base));
        assert!(!is_within(Path::new("/site-other/js"), base));
        assert!(!is_within(Path::new("/"), base));
    }
}
