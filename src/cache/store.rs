//! Cache backends.

use std::fs;
use std::io;
use std::path::PathBuf;

use dashmap::DashMap;

/// Key/value byte store behind a [`Cache`](super::Cache).
pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn set(&self, key: &str, value: &[u8]) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}

// ============================================================================
// Memory
// ============================================================================

/// In-process store, dropped with the environment.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).map(|v| v.clone())
    }

    fn set(&self, key: &str, value: &[u8]) -> io::Result<()> {
        self.entries.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        self.entries.clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

// ============================================================================
// File
// ============================================================================

/// On-disk store sharded by the first two key characters.
///
/// ```text
/// .tola/cache/assets/
/// ├── 3f/3fa81c…
/// └── a0/a09b2e…
/// ```
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let shard = key.get(..2).unwrap_or("__");
        self.dir.join(shard).join(key)
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.entry_path(key)).ok()
    }

    fn set(&self, key: &str, value: &[u8]) -> io::Result<()> {
        let path = self.entry_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write-then-rename so readers never see a partial entry.
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.dir) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

// ============================================================================
// Null
// ============================================================================

/// Stores nothing; every lookup misses.
#[derive(Default)]
pub struct NullStore;

impl Store for NullStore {
    fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _key: &str, _value: &[u8]) -> io::Result<()> {
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}
