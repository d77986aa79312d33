//! Compile cache.
//!
//! One [`Cache`] per environment, wrapping the backend picked from
//! `[assets.caching]`:
//!
//! | enabled | type       | backend                |
//! |---------|------------|------------------------|
//! | false   | (any)      | [`NullStore`]          |
//! | true    | `"memory"` | [`MemoryStore`]        |
//! | true    | `"file"`   | [`FileStore`]          |
//! | true    | other      | configuration error    |

mod store;

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::asset::AssetError;
use crate::config::{AssetsConfig, CachingConfig};
use crate::debug;

pub use store::{FileStore, MemoryStore, NullStore, Store};

/// Logging decorator over a [`Store`], with per-key in-flight dedup.
pub struct Cache {
    store: Box<dyn Store>,
    inflight: DashMap<String, Arc<Mutex<()>>>,
}

impl Cache {
    pub fn new(store: Box<dyn Store>) -> Self {
        Self {
            store,
            inflight: DashMap::new(),
        }
    }

    /// Pick the backend for `caching`. `dir` is used by the file backend.
    pub fn from_config(caching: &CachingConfig, dir: PathBuf) -> Result<Self, AssetError> {
        if !caching.enabled {
            return Ok(Self::new(Box::new(NullStore)));
        }
        let store: Box<dyn Store> = match caching.kind.as_deref() {
            Some("memory") => Box::new(MemoryStore::new()),
            Some("file") => Box::new(FileStore::new(dir)),
            other => {
                return Err(AssetError::Configuration {
                    field: AssetsConfig::CACHING_TYPE,
                    message: match other {
                        Some(kind) => format!("unknown cache type `{kind}` (expected memory or file)"),
                        None => "caching is enabled but no cache type is set".into(),
                    },
                });
            }
        };
        Ok(Self::new(store))
    }

    pub fn backend(&self) -> &'static str {
        self.store.name()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        let value = self.store.get(key);
        match value {
            Some(_) => debug!("cache"; "hit {}", short(key)),
            None => debug!("cache"; "miss {}", short(key)),
        }
        value
    }

    /// Store `value`. Write failures are logged, never fatal.
    pub fn set(&self, key: &str, value: &[u8]) {
        match self.store.set(key, value) {
            Ok(()) => debug!("cache"; "write {} ({} bytes)", short(key), value.len()),
            Err(e) => debug!("cache"; "write {} failed: {}", short(key), e),
        }
    }

    pub fn clear(&self) -> std::io::Result<()> {
        debug!("cache"; "clear {}", self.backend());
        self.store.clear()
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    ///
    /// Concurrent callers missing on the same key run `compute` once; the
    /// rest wait and reuse the stored value.
    pub fn fetch<E>(
        &self,
        key: &str,
        compute: impl FnOnce() -> Result<Vec<u8>, E>,
    ) -> Result<Vec<u8>, E> {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }

        let gate = Arc::clone(self.inflight.entry(key.to_owned()).or_default().value());
        let guard = gate.lock();

        // Another caller may have filled it while we waited.
        let result = match self.store.get(key) {
            Some(hit) => {
                debug!("cache"; "hit {} (after wait)", short(key));
                Ok(hit)
            }
            None => compute().inspect(|value| self.set(key, value)),
        };

        self.inflight.remove_if(key, |_, g| Arc::ptr_eq(g, &gate));
        drop(guard);
        result
    }
}

#[inline]
fn short(key: &str) -> &str {
    key.get(..12).unwrap_or(key)
}
