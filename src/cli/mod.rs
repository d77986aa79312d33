//! Command-line interface module.

mod args;
pub mod build;
pub mod clean;
pub mod payload;

pub use args::{Cli, Commands, EnvArgs};
