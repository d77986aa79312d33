//! `clean`: clear the configured cache backend.

use anyhow::{Context, Result};

use crate::cache::Cache;
use crate::config::SiteConfig;
use crate::env::cache_dir;
use crate::log;

pub fn clean_cache(config: &SiteConfig) -> Result<()> {
    let dir = cache_dir(&config.output_dir(), &config.source_dir(), &config.assets.caching);
    let cache = Cache::from_config(&config.assets.caching, dir.clone())?;
    cache
        .clear()
        .with_context(|| format!("Failed to clear cache at {}", dir.display()))?;
    log!("cache"; "cleared {} cache", cache.backend());
    Ok(())
}
