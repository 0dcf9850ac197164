//! Configuration section definitions.
//!
//! Each module corresponds to a section in `quire.toml`:
//!
//! | Module  | TOML Section | Purpose                              |
//! |---------|--------------|--------------------------------------|
//! | `build` | `[build]`    | Content, assets and output paths     |
//! | `serve` | `[serve]`    | Development server                   |
//! | `site`  | `[site]`     | Site-wide settings (alternatives)    |

mod build;
mod serve;
mod site;

pub use build::BuildSectionConfig;
pub use serve::ServeConfig;
pub use site::SiteSectionConfig;
