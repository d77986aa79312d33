//! tola-assets - asset pipeline environment for tola sites.

#![allow(dead_code)]

mod asset;
mod cache;
mod cli;
mod config;
mod env;
mod hooks;
mod logger;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;
use hooks::HookBus;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let mut config = SiteConfig::load(&cli)?;
    let hooks = HookBus::shared();

    match &cli.command {
        Commands::Build { args } => {
            config.apply_env_args(args);
            cli::build::build_assets(&config, hooks).map(|_| ())
        }
        Commands::Payload { args } => {
            config.apply_env_args(args);
            cli::payload::print_payload(&config, hooks)
        }
        Commands::Clean => cli::clean::clean_cache(&config),
    }
}
