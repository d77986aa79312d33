//! Source processors.
//!
//! A processor consumes one trailing extension: `app.js.tmpl` is handled by
//! the `template` processor and compiles to `app.js`. Processors that run
//! embedded commands are marked dynamic and are removed in safe mode.

use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};

use super::error::BoxError;
use crate::debug;
use crate::utils::exec::Cmd;

/// Inputs available to a processor.
#[derive(Debug, Clone, Copy)]
pub struct ProcessContext<'a> {
    /// Site root, the working directory for commands.
    pub root: &'a Path,
    /// Source file being processed.
    pub path: &'a Path,
}

pub trait Processor: Send + Sync {
    /// Registry name.
    fn name(&self) -> &'static str;

    /// Source extension this processor consumes, without the dot.
    fn extension(&self) -> &'static str;

    /// Whether processing can run arbitrary commands.
    fn executes_code(&self) -> bool {
        false
    }

    fn process(&self, source: &str, ctx: &ProcessContext<'_>) -> Result<String, BoxError>;
}

// ============================================================================
// Template Processor
// ============================================================================

static RE_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<%=(.*?)%>").unwrap());

/// Expands `<%= command %>` blocks with the command's trimmed stdout.
///
/// ```text
/// const BUILT = "<%= date +%Y %>";   →   const BUILT = "2026";
/// ```
pub struct TemplateProcessor;

impl Processor for TemplateProcessor {
    fn name(&self) -> &'static str {
        "template"
    }

    fn extension(&self) -> &'static str {
        "tmpl"
    }

    fn executes_code(&self) -> bool {
        true
    }

    fn process(&self, source: &str, ctx: &ProcessContext<'_>) -> Result<String, BoxError> {
        let mut failure = None;
        let out = RE_BLOCK.replace_all(source, |caps: &Captures| {
            if failure.is_some() {
                return String::new();
            }
            let command = caps[1].trim();
            debug!("env"; "template {}: {}", ctx.path.display(), command);
            match Cmd::shell(command).cwd(ctx.root).run() {
                Ok(output) => String::from_utf8_lossy(&output.stdout).trim().to_owned(),
                Err(e) => {
                    failure = Some(e);
                    String::new()
                }
            }
        });
        match failure {
            Some(e) => Err(e.into()),
            None => Ok(out.into_owned()),
        }
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Ordered set of processors available to the compiler.
#[derive(Clone)]
pub struct ProcessorRegistry {
    processors: Vec<Arc<dyn Processor>>,
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(TemplateProcessor));
        registry
    }
}

impl ProcessorRegistry {
    pub fn empty() -> Self {
        Self { processors: vec![] }
    }

    /// Add `processor`, replacing any existing one with the same name.
    pub fn register(&mut self, processor: Arc<dyn Processor>) {
        self.processors.retain(|p| p.name() != processor.name());
        self.processors.push(processor);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Processor>> {
        self.processors.iter().find(|p| p.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Extensions of every registered processor.
    pub fn extensions(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.extension()).collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Processor>> {
        self.processors.iter()
    }

    /// Drop every processor that executes commands. Returns how many went.
    fn remove_dynamic(&mut self) -> usize {
        let before = self.processors.len();
        self.processors.retain(|p| !p.executes_code());
        before - self.processors.len()
    }
}

/// Strip command-running processors when the site builds in safe mode.
pub fn apply_safe_mode(registry: &mut ProcessorRegistry, safe: bool) {
    if !safe {
        return;
    }
    let removed = registry.remove_dynamic();
    debug!("env"; "safe mode: removed {} dynamic processor(s)", removed);
}
