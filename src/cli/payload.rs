//! `payload`: show what templates receive under `assets`.

use std::io::{Write, stdout};
use std::sync::Arc;

use anyhow::Result;

use crate::config::SiteConfig;
use crate::env::Env;
use crate::hooks::{HookBus, RenderContext, SiteEvent};

pub fn print_payload(config: &SiteConfig, hooks: Arc<HookBus>) -> Result<()> {
    let _env = Env::new(config, Arc::clone(&hooks))?;

    let mut ctx = RenderContext::new();
    hooks.site.trigger(SiteEvent::PreRender, &mut ctx)?;

    let mut out = stdout().lock();
    serde_json::to_writer_pretty(&mut out, &ctx.to_json())?;
    writeln!(out)?;
    Ok(())
}
