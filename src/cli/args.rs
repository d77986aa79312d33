//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// tola-assets: asset pipeline for tola sites
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: tola-assets.toml)
    #[arg(short = 'C', long, default_value = "tola-assets.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize the asset environment: precompile and copy raw assets
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        args: EnvArgs,
    },

    /// Print the template payload as JSON
    #[command(visible_alias = "p")]
    Payload {
        #[command(flatten)]
        args: EnvArgs,
    },

    /// Clear the asset cache
    Clean,
}

/// Shared arguments for commands that build an environment
#[derive(clap::Args, Debug, Clone, Default)]
pub struct EnvArgs {
    /// Safe mode: disable processors that run shell commands
    #[arg(short, long)]
    pub safe: bool,

    /// Show debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,
}
