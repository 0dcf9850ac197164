//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! content = "content"         # Record sources (relative to project root)
//! assets = "assets"           # Static files copied as-is
//! output = "public"           # Build output, served by `quire serve`
//! extra_flags = ["force"]     # Flags handed to the builder
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    pub content: PathBuf,
    pub assets: PathBuf,
    pub output: PathBuf,
    pub extra_flags: Vec<String>,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            content: "content".into(),
            assets: "assets".into(),
            output: "public".into(),
            extra_flags: Vec::new(),
        }
    }
}
