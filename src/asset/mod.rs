//! Asset pipeline building blocks.
//!
//! | Module       | Role                                              |
//! |--------------|---------------------------------------------------|
//! | `search`     | search paths and source registration              |
//! | `glob`       | glob targets expanded against the search paths    |
//! | `process`    | source processors and the safe-mode guard         |
//! | `minify`     | JS / CSS compression                              |
//! | `compile`    | the `Compile` seam and the default `Compiler`     |
//! | `manifest`   | fingerprinted outputs and `manifest.json`         |
//! | `precompile` | the precompile pass                               |
//! | `raw`        | verbatim copies from `raw_precompile`             |
//! | `drop`       | template payload                                  |

pub mod compile;
pub mod drop;
mod error;
pub mod glob;
pub mod manifest;
pub mod minify;
pub mod precompile;
pub mod process;
pub mod raw;
pub mod search;

pub use compile::{Compile, CompileContext, CompiledAsset, Compiler};
pub use drop::{AssetDrop, HostContext, build_payload};
pub use error::{AssetError, BoxError};
pub use manifest::{Manifest, ManifestEntry};
pub use process::{Processor, ProcessorRegistry, apply_safe_mode};
pub use raw::{RawCopy, copy_raw};
pub use search::{SearchPaths, register_sources};
