//! Process-wide server settings.

use super::QuireConfig;
use crate::site::{Environment, FsEnvironment};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Immutable settings shared by every request.
///
/// Built once at startup and handed to request workers as
/// `Arc<ServerConfig>`. There are no setters: `with_*` methods consume the
/// value and are meant for construction only.
#[derive(Clone)]
pub struct ServerConfig {
    env: Arc<dyn Environment>,
    output_path: PathBuf,
    ui_lang: String,
    extra_flags: Vec<String>,
    verbosity: u8,
    admin_prefix: String,
}

impl ServerConfig {
    /// Settings with default UI language (`en`), no extra flags, verbosity 0
    /// and admin prefix `/admin`.
    pub fn new(env: Arc<dyn Environment>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            env,
            output_path: output_path.into(),
            ui_lang: "en".into(),
            extra_flags: Vec::new(),
            verbosity: 0,
            admin_prefix: "/admin".into(),
        }
    }

    /// Derive the server settings from a loaded `quire.toml`.
    pub fn from_config(config: &QuireConfig) -> Self {
        let name = config
            .get_root()
            .file_name()
            .map_or_else(|| "site".to_string(), |n| n.to_string_lossy().into_owned());
        let env = FsEnvironment::new(
            name,
            &config.build.content,
            &config.build.assets,
            config.site.alternatives.clone(),
        );

        Self::new(Arc::new(env), &config.build.output)
            .with_ui_lang(&config.serve.ui_lang)
            .with_extra_flags(config.build.extra_flags.clone())
            .with_verbosity(config.verbosity)
            .with_admin_prefix(&config.serve.admin_prefix)
    }

    pub fn with_ui_lang(mut self, ui_lang: impl Into<String>) -> Self {
        self.ui_lang = ui_lang.into();
        self
    }

    pub fn with_extra_flags(mut self, extra_flags: Vec<String>) -> Self {
        self.extra_flags = extra_flags;
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Expects a normalized prefix (`/admin`, no trailing slash).
    pub fn with_admin_prefix(mut self, admin_prefix: impl Into<String>) -> Self {
        self.admin_prefix = admin_prefix.into();
        self
    }

    pub fn env(&self) -> &dyn Environment {
        self.env.as_ref()
    }

    /// Absolute output root. Every served file lives below it.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn ui_lang(&self) -> &str {
        &self.ui_lang
    }

    pub fn extra_flags(&self) -> &[String] {
        &self.extra_flags
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    pub fn admin_prefix(&self) -> &str {
        &self.admin_prefix
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("env", &self.env.name())
            .field("output_path", &self.output_path)
            .field("ui_lang", &self.ui_lang)
            .field("extra_flags", &self.extra_flags)
            .field("verbosity", &self.verbosity)
            .field("admin_prefix", &self.admin_prefix)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_from_config() {
        let mut config = test_parse_config(
            "[build]\noutput = \"/srv/out\"\nextra_flags = [\"force\"]\n[serve]\nui_lang = \"fr\"",
        );
        config.root = PathBuf::from("/srv/my-site");
        config.verbosity = 1;

        let server = ServerConfig::from_config(&config);
        assert_eq!(server.env().name(), "my-site");
        assert_eq!(server.output_path(), Path::new("/srv/out"));
        assert_eq!(server.ui_lang(), "fr");
        assert_eq!(server.extra_flags(), ["force".to_string()]);
        assert_eq!(server.verbosity(), 1);
        assert_eq!(server.admin_prefix(), "/admin");
    }

    #[test]
    fn test_debug_names_env() {
        let config = test_parse_config("");
        let server = ServerConfig::from_config(&config);
        assert!(format!("{server:?}").contains("ServerConfig"));
    }
}
