//! The asset environment: one per build.
//!
//! [`Env::new`] drives the whole initialization in a fixed order:
//!
//! ```text
//! Created ─► ConfigResolved ─► HooksBeforeInit ─► BaseInitialized
//!         ─► SafeModeApplied ─► SourcesRegistered ─► DropsHooked
//!         ─► Precompiled ─► RawCopied ─► Ready
//! ```
//!
//! Any failure aborts construction, so an `Env` the caller holds is always
//! `Ready`. The cache backend is built on first use; the precompile phase
//! asks for it before compiling anything.


use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;

use crate::asset::{
    AssetDrop, AssetError, Compile, CompileContext, Compiler, HostContext, Manifest,
    ManifestEntry, ProcessorRegistry, RawCopy, SearchPaths, apply_safe_mode, build_payload,
    copy_raw, precompile, raw, register_sources,
};
use crate::cache::Cache;
use crate::config::{AssetsConfig, CachingConfig, SiteConfig, expand_home};
use crate::debug;
use crate::hooks::{EnvEvent, HookBus, HookId, RenderContext, SiteEvent};

/// Priority of the payload hook on `site/pre_render`.
pub const PAYLOAD_PRIORITY: i32 = -100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnvState {
    Created,
    ConfigResolved,
    HooksBeforeInit,
    BaseInitialized,
    SafeModeApplied,
    SourcesRegistered,
    DropsHooked,
    Precompiled,
    RawCopied,
    Ready,
}

pub struct Env {
    state: EnvState,
    config: AssetsConfig,

    /// Site source root; sources are relative to it.
    root: PathBuf,
    /// Sources must resolve inside this directory.
    cwd: PathBuf,
    output: PathBuf,
    site_url: Option<String>,
    safe: bool,

    hooks: Arc<HookBus>,
    compiler: Arc<dyn Compile>,
    processors: ProcessorRegistry,
    search_paths: SearchPaths,
    manifest: Manifest,
    cache: Mutex<Option<Arc<Cache>>>,

    precompiled: Vec<ManifestEntry>,
    raw_copies: Vec<RawCopy>,
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("state", &self.state)
            .field("root", &self.root)
            .field("output", &self.output)
            .field("search_paths", &self.search_paths)
            .field("processors", &self.processors.names())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Initialization
// ============================================================================

impl Env {
    /// Build and fully initialize the environment for `site`.
    pub fn new(site: &SiteConfig, hooks: Arc<HookBus>) -> Result<Self> {
        Self::with_compiler(site, hooks, Arc::new(Compiler))
    }

    /// Like [`Env::new`] with a custom compilation engine.
    pub fn with_compiler(
        site: &SiteConfig,
        hooks: Arc<HookBus>,
        compiler: Arc<dyn Compile>,
    ) -> Result<Self> {
        let output = site.output_dir();
        let mut env = Self {
            state: EnvState::Created,
            config: site.assets.clone(),
            root: site.source_dir(),
            cwd: site.cwd.clone(),
            manifest: Manifest::new(&output, false),
            output,
            site_url: site.site.url.clone(),
            safe: site.build.safe,
            hooks,
            compiler,
            processors: ProcessorRegistry::empty(),
            search_paths: SearchPaths::new(),
            cache: Mutex::new(None),
            precompiled: vec![],
            raw_copies: vec![],
        };

        env.advance(EnvState::ConfigResolved);

        env.trigger(EnvEvent::BeforeInit)?;
        env.advance(EnvState::HooksBeforeInit);

        env.init_base();
        env.advance(EnvState::BaseInitialized);

        apply_safe_mode(&mut env.processors, env.safe);
        env.advance(EnvState::SafeModeApplied);

        register_sources(&mut env.search_paths, &env.config.sources, &env.root, &env.cwd);
        env.advance(EnvState::SourcesRegistered);

        let payload_hook = env.hook_payload();
        env.advance(EnvState::DropsHooked);

        // A failed build must not leave its payload hook on the shared bus.
        if let Err(e) = env.finish_init() {
            env.hooks.site.unregister(SiteEvent::PreRender, payload_hook);
            return Err(e);
        }
        env.advance(EnvState::Ready);
        Ok(env)
    }

    fn finish_init(&mut self) -> Result<()> {
        self.precompiled = self.run_precompile().context("precompile failed")?;
        self.advance(EnvState::Precompiled);

        self.raw_copies = self.run_raw_copy().context("raw asset copy failed")?;
        self.advance(EnvState::RawCopied);

        self.trigger(EnvEvent::AfterInit)
    }

    fn advance(&mut self, next: EnvState) {
        debug_assert!(next > self.state);
        self.state = next;
        debug!("env"; "{:?}", next);
    }

    fn trigger(&mut self, event: EnvEvent) -> Result<()> {
        let hooks = Arc::clone(&self.hooks);
        hooks.env.trigger(event, self)
    }

    fn init_base(&mut self) {
        self.processors = ProcessorRegistry::default();
        self.manifest = Manifest::new(self.in_dest_dir::<&str>(&[]), self.config.gzip);
    }

    fn hook_payload(&self) -> HookId {
        let paths = self.search_paths.clone();
        let host = self.host_context();
        self.hooks
            .site
            .register(SiteEvent::PreRender, PAYLOAD_PRIORITY, move |ctx: &mut RenderContext| {
                let payload = build_payload(&paths, &host);
                ctx.insert(RenderContext::ASSETS, serde_json::to_value(&payload)?);
                Ok(())
            })
    }

    fn run_precompile(&mut self) -> Result<Vec<ManifestEntry>, AssetError> {
        let cache = self.cache()?;
        let compiler = Arc::clone(&self.compiler);
        let ctx = CompileContext {
            search_paths: &self.search_paths,
            processors: &self.processors,
            cache: &cache,
            root: &self.root,
            compress: self.config.compression,
        };
        precompile::run(&self.config.precompile, &*compiler, &ctx, &mut self.manifest)
    }

    fn run_raw_copy(&self) -> Result<Vec<RawCopy>, AssetError> {
        let copies = raw::expand(
            &self.config.raw_precompile,
            &self.search_paths,
            &self.output,
            self.config.destination_dir(),
        )?;
        copy_raw(&copies)?;
        Ok(copies)
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl Env {
    pub fn state(&self) -> EnvState {
        self.state
    }

    pub fn asset_config(&self) -> &AssetsConfig {
        &self.config
    }

    /// Mutable config, meant for `env/before_init` hooks.
    pub fn asset_config_mut(&mut self) -> &mut AssetsConfig {
        &mut self.config
    }

    pub fn search_paths(&self) -> &SearchPaths {
        &self.search_paths
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn processors(&self) -> &ProcessorRegistry {
        &self.processors
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Entries compiled by the precompile phase.
    pub fn precompiled(&self) -> &[ManifestEntry] {
        &self.precompiled
    }

    pub fn raw_copies(&self) -> &[RawCopy] {
        &self.raw_copies
    }

    /// Whether writers should skip `.gz` siblings.
    pub fn skip_gzip(&self) -> bool {
        !self.config.gzip
    }

    /// `<output>/<destination>/<parts...>`.
    pub fn in_dest_dir<P: AsRef<Path>>(&self, parts: &[P]) -> PathBuf {
        let mut path = self.output.join(self.config.destination_dir());
        path.extend(parts);
        path
    }

    /// `<cache dir>/<parts...>`.
    pub fn in_cache_dir<P: AsRef<Path>>(&self, parts: &[P]) -> PathBuf {
        let mut path = cache_dir(&self.output, &self.root, &self.config.caching);
        path.extend(parts);
        path
    }

    pub fn host_context(&self) -> Arc<HostContext> {
        Arc::new(HostContext {
            url: self.site_url.clone(),
            destination: self.config.destination.clone(),
        })
    }

    /// Fresh payload of every public file under the search paths.
    pub fn to_payload(&self) -> BTreeMap<String, AssetDrop> {
        build_payload(&self.search_paths, &self.host_context())
    }

    /// The cache, built on first call and shared afterwards.
    pub fn cache(&self) -> Result<Arc<Cache>, AssetError> {
        let mut slot = self.cache.lock();
        if let Some(cache) = slot.as_ref() {
            return Ok(Arc::clone(cache));
        }
        let dir = self.in_cache_dir::<&str>(&[]);
        let cache = Arc::new(Cache::from_config(&self.config.caching, dir)?);
        debug!("cache"; "using {} backend", cache.backend());
        *slot = Some(Arc::clone(&cache));
        Ok(cache)
    }
}

/// Directory of the file cache backend.
///
/// Relative paths (after `~` expansion) are taken from the parent of the
/// output directory, falling back to `root`.
pub fn cache_dir(output: &Path, root: &Path, caching: &CachingConfig) -> PathBuf {
    let path = expand_home(&caching.path);
    if path.is_absolute() {
        return path;
    }
    output.parent().unwrap_or(root).join(path)
}
