//! Logical path and URL helpers.
//!
//! Logical paths are the `/`-separated names assets are known by
//! (`js/app.js`), independent of the host OS separator.

use std::path::Path;

/// Render a relative path with `/` separators.
///
/// # Examples
/// ```ignore
/// assert_eq!(to_slash(Path::new("js/app.js")), "js/app.js");
/// ```
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Join URL segments with exactly one `/` between them.
///
/// Empty segments are skipped; the result keeps a leading `/` when the
/// first non-empty segment had one, or when it is a scheme URL.
///
/// # Examples
/// ```ignore
/// assert_eq!(join_url(&["/assets/", "/app.js"]), "/assets/app.js");
/// assert_eq!(join_url(&["https://example.com/", "assets", "a.png"]), "https://example.com/assets/a.png");
/// ```
pub fn join_url(segments: &[&str]) -> String {
    let mut out = String::new();
    for seg in segments.iter().filter(|s| !s.is_empty()) {
        if out.is_empty() {
            out.push_str(seg.trim_end_matches('/'));
            if out.is_empty() {
                out.push('/');
            }
            continue;
        }
        let seg = seg.trim_matches('/');
        if seg.is_empty() {
            continue;
        }
        if !out.ends_with('/') {
            out.push('/');
        }
        out.push_str(seg);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_slash() {
        assert_eq!(to_slash(Path::new("js/app.js")), "js/app.js");
        assert_eq!(to_slash(Path::new("app.js")), "app.js");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url(&["/assets/", "/app.js"]), "/assets/app.js");
        assert_eq!(join_url(&["", "/assets", "img/a.png"]), "/assets/img/a.png");
        assert_eq!(
            join_url(&["https://example.com/", "assets", "a.png"]),
            "https://example.com/assets/a.png"
        );
        assert_eq!(join_url(&["/", "a.png"]), "/a.png");
    }
}
