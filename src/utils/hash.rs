//! Content digests using blake3.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let d = hash::digest(b"body {}");   // -> 64 hex chars
//! let fp = hash::fingerprint(&d);     // -> "a1b2c3d4"
//! let key = hash::key(&["js/app.js", &d, "compress"]);
//! ```

/// Compute the blake3 digest of `data` as lowercase hex.
#[inline]
pub fn digest<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    hex::encode(blake3::hash(data.as_ref()).as_bytes())
}

/// First 8 hex chars of a digest, used in output file names.
#[inline]
pub fn fingerprint(digest: &str) -> &str {
    &digest[..digest.len().min(8)]
}

/// Derive a stable key from several parts.
///
/// Parts are length-prefixed so `["ab", "c"]` and `["a", "bc"]` differ.
pub fn key(parts: &[&str]) -> String {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(&(part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize().as_bytes())
}
