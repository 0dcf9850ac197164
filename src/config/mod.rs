//! Configuration for `quire.toml` and the per-process server settings.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [site], [build], [serve] definitions
//! ├── error.rs       # ConfigError
//! ├── server.rs      # ServerConfig (immutable, shared by every request)
//! └── mod.rs         # QuireConfig (this file)
//! ```
//!
//! `QuireConfig` is the file as written, merged with CLI overrides and with
//! all paths made absolute. `ServerConfig` is derived from it once at startup.

mod error;
pub mod section;
mod server;
mod util;

pub use error::ConfigError;
pub use section::{BuildSectionConfig, ServeConfig, SiteSectionConfig};
pub use server::ServerConfig;

use util::{find_config_file, normalize_path, normalize_prefix};

use crate::{
    cli::{Cli, Commands, ServeArgs},
    debug, log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing quire.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuireConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteSectionConfig,

    #[serde(default)]
    pub build: BuildSectionConfig,

    #[serde(default)]
    pub serve: ServeConfig,

    /// Verbosity from `-v` (internal use only)
    #[serde(skip)]
    pub verbosity: u8,
}

impl QuireConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file. Without one, the
    /// defaults apply and cwd is the project root.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = Some(path);
                config
            }
            None => {
                debug!("config"; "{} not found, using defaults", cli.config.display());
                let cwd = std::env::current_dir().context("Failed to get current working directory")?;
                Self {
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        match &cli.command {
            Commands::Serve { args } => config.apply_serve_args(args),
        }
        config.finalize()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Apply serve-specific options from the CLI.
    fn apply_serve_args(&mut self, args: &ServeArgs) {
        Self::update_option(&mut self.build.output, args.output.as_ref());
        Self::update_option(&mut self.serve.interface, args.interface.as_ref());
        Self::update_option(&mut self.serve.port, args.port.as_ref());
        Self::update_option(&mut self.serve.ui_lang, args.ui_lang.as_ref());
        Self::update_option(&mut self.serve.admin_prefix, args.admin_prefix.as_ref());
        self.build.extra_flags.extend(args.extra_flags.iter().cloned());
        self.verbosity = args.verbose;
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate, then normalize paths and the admin prefix.
    fn finalize(&mut self) -> Result<(), ConfigError> {
        self.serve.admin_prefix = normalize_prefix(&self.serve.admin_prefix).ok_or_else(|| {
            ConfigError::validation(
                "serve.admin_prefix",
                format!(
                    "`{}` would shadow the whole site, use a path like `/admin`",
                    self.serve.admin_prefix
                ),
            )
        })?;

        if self.serve.ui_lang.trim().is_empty() {
            return Err(ConfigError::validation("serve.ui_lang", "must not be empty"));
        }

        if let Some(alt) = self
            .site
            .alternatives
            .iter()
            .find(|alt| alt.is_empty() || alt.contains('/') || alt.starts_with(['.', '_']))
        {
            return Err(ConfigError::validation(
                "site.alternatives",
                format!("`{alt}` is not a valid URL segment"),
            ));
        }

        self.normalize_paths();
        Ok(())
    }

    /// Normalize all paths relative to root directory.
    fn normalize_paths(&mut self) {
        let root = normalize_path(&self.root);
        self.build.content = normalize_path(&root.join(&self.build.content));
        self.build.assets = normalize_path(&root.join(&self.build.assets));
        self.build.output = normalize_path(&root.join(&self.build.output));
        self.root = root;
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config text. Panics if there are unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> QuireConfig {
    let (parsed, ignored) = QuireConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
