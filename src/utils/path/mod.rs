//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `clean_path`, `is_within`)
//! - [`route`]: Logical path and URL helpers (`to_slash`, `join_url`)

pub mod fs;
pub mod route;

pub use fs::{clean_path, is_within, normalize_path};
pub use route::{join_url, to_slash};
