//! `build`: run the full environment initialization.

use std::sync::Arc;

use anyhow::Result;

use crate::config::SiteConfig;
use crate::env::Env;
use crate::hooks::HookBus;
use crate::log;

pub fn build_assets(config: &SiteConfig, hooks: Arc<HookBus>) -> Result<Env> {
    let env = Env::new(config, hooks)?;

    let compiled = env.precompiled().len();
    let copied = env.raw_copies().len();
    log!(
        "precompile";
        "compiled {} asset{} into {}",
        compiled,
        if compiled == 1 { "" } else { "s" },
        env.manifest().dir().display()
    );
    if copied > 0 {
        log!("raw"; "copied {} file{}", copied, if copied == 1 { "" } else { "s" });
    }
    Ok(env)
}
