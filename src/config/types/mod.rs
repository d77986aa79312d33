//! Configuration utility types.
//!
//! | Module  | Purpose                          |
//! |---------|----------------------------------|
//! | `error` | Configuration loading errors     |
//! | `field` | Dotted field paths for messages  |

mod error;
mod field;

pub use error::ConfigError;
pub use field::FieldPath;
