//! Lifecycle hooks.
//!
//! A [`HookBus`] is owned by the host and shared with every [`Env`] it
//! builds. Callbacks are grouped by scope:
//!
//! | Scope  | Events                        | Context            |
//! |--------|-------------------------------|--------------------|
//! | `env`  | `before_init`, `after_init`   | `&mut Env`         |
//! | `site` | `pre_render`                  | `&mut RenderContext` |
//!
//! Callbacks for one event run in ascending priority; equal priorities run
//! in registration order.
//!
//! [`Env`]: crate::env::Env

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

use crate::debug;
use crate::env::Env;

/// Default priority for callbacks that don't care about ordering.
pub const NORMAL: i32 = 0;

// ============================================================================
// Events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvEvent {
    /// Config resolved, nothing else built yet.
    BeforeInit,
    /// Precompile and raw copy finished.
    AfterInit,
}

impl fmt::Display for EnvEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeInit => f.write_str("env/before_init"),
            Self::AfterInit => f.write_str("env/after_init"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteEvent {
    /// Right before templates are rendered.
    PreRender,
}

impl fmt::Display for SiteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreRender => f.write_str("site/pre_render"),
        }
    }
}

// ============================================================================
// Render Context
// ============================================================================

/// Template data handed to `site` hooks.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub data: Map<String, Value>,
}

impl RenderContext {
    /// Key under which the asset payload is published.
    pub const ASSETS: &'static str = "assets";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.data.clone())
    }
}

// ============================================================================
// Registry
// ============================================================================

pub type Callback<C> = Arc<dyn Fn(&mut C) -> Result<()> + Send + Sync>;

/// Handle returned by [`Registry::register`], used to remove the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookId(u64);

struct Registration<C> {
    id: HookId,
    priority: i32,
    callback: Callback<C>,
}

impl<C> Clone for Registration<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            priority: self.priority,
            callback: Arc::clone(&self.callback),
        }
    }
}

/// Callbacks of one scope, keyed by event.
pub struct Registry<E, C> {
    hooks: RwLock<FxHashMap<E, Vec<Registration<C>>>>,
    next_id: AtomicU64,
}

impl<E, C> Default for Registry<E, C> {
    fn default() -> Self {
        Self {
            hooks: RwLock::new(FxHashMap::default()),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<E, C> Registry<E, C>
where
    E: Copy + Eq + Hash + fmt::Display,
{
    /// Register `callback` for `event`.
    pub fn register<F>(&self, event: E, priority: i32, callback: F) -> HookId
    where
        F: Fn(&mut C) -> Result<()> + Send + Sync + 'static,
    {
        let id = HookId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut hooks = self.hooks.write();
        let list = hooks.entry(event).or_default();
        // Insert after every entry with priority <= ours to keep ties stable.
        let at = list.partition_point(|r| r.priority <= priority);
        list.insert(
            at,
            Registration {
                id,
                priority,
                callback: Arc::new(callback),
            },
        );
        id
    }

    /// Remove the callback registered as `id`. Returns whether it was found.
    pub fn unregister(&self, event: E, id: HookId) -> bool {
        let mut hooks = self.hooks.write();
        let Some(list) = hooks.get_mut(&event) else {
            return false;
        };
        let before = list.len();
        list.retain(|r| r.id != id);
        before != list.len()
    }

    /// Run every callback for `event` against `ctx`.
    ///
    /// The list is snapshotted first, so callbacks may register more hooks.
    /// The first failing callback stops the run.
    pub fn trigger(&self, event: E, ctx: &mut C) -> Result<()> {
        let snapshot: Vec<Registration<C>> = self
            .hooks
            .read()
            .get(&event)
            .cloned()
            .unwrap_or_default();

        debug!("hook"; "{} ({} callbacks)", event, snapshot.len());
        for (i, reg) in snapshot.iter().enumerate() {
            (reg.callback)(ctx).with_context(|| format!("hook #{} for {} failed", i, event))?;
        }
        Ok(())
    }

    pub fn len(&self, event: E) -> usize {
        self.hooks.read().get(&event).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, event: E) -> bool {
        self.len(event) == 0
    }
}

// ============================================================================
// Bus
// ============================================================================

/// All hook registries of one host.
#[derive(Default)]
pub struct HookBus {
    pub env: Registry<EnvEvent, Env>,
    pub site: Registry<SiteEvent, RenderContext>,
}

impl HookBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

// ============================================================================
// Tests
// ============================================================================
