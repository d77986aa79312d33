//! Utility modules shared across the asset environment.

pub mod exec;
pub mod hash;
pub mod path;
