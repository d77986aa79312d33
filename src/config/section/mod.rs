//! Configuration section definitions.
//!
//! Each module corresponds to a section in `tola-assets.toml`:
//!
//! | Module   | TOML Section | Purpose                                  |
//! |----------|--------------|------------------------------------------|
//! | `assets` | `[assets]`   | Pipeline options (sources, precompile)   |
//! | `build`  | `[build]`    | Site source root, output, safe mode      |
//! | `site`   | `[site]`     | Public URL used by template drops        |

pub mod assets;
mod build;
mod site;

pub use assets::{AssetsConfig, CachingConfig, RawEntry};
pub use build::BuildSectionConfig;
pub use site::SiteSectionConfig;
