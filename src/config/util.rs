//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/site/content/blog/  ← cwd
/// /home/user/site/quire.toml     ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}

/// Normalize an admin prefix to `/segment[/segment...]`.
///
/// Returns `None` when nothing but slashes remains.
///
/// # Examples
/// ```ignore
/// normalize_prefix("admin")     -> Some("/admin")
/// normalize_prefix("/admin/")   -> Some("/admin")
/// normalize_prefix("//a//b/")   -> Some("/a/b")
/// normalize_prefix("/")         -> None
/// ```
pub fn normalize_prefix(prefix: &str) -> Option<String> {
    let segments: Vec<&str> = prefix.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return None;
    }
    Some(format!("/{}", segments.join("/")))
}

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`), falls back
/// to joining with the current directory.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

// ============================================================================
// tests
// ============================================================================
