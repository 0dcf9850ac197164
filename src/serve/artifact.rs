//! Resolve a request path to a file, building it first when needed.

use super::error::ResolveError;
use super::locator::{fallback_filename, primary_artifact};
use super::resolver::{Resolution, resolve};
use super::trigger;
use crate::config::ServerConfig;
use crate::core::RequestTarget;
use crate::site::Pad;
use std::path::PathBuf;

/// Where a request path ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveResult {
    /// Name of the primary artifact. Set only when a source was resolved
    /// and its build produced a primary artifact.
    pub artifact_name: Option<String>,
    /// File to serve: the primary artifact's destination, otherwise the
    /// request path joined onto the output root. Always inside the output
    /// root; it may not exist.
    pub filename: PathBuf,
    /// Record path. Set only when the resolved source is a content record.
    pub record_path: Option<String>,
    /// Alt of the resolved source. Set only when a source was resolved and
    /// it is a content record.
    pub alt: Option<String>,
}

/// Either a file location or a redirect issued instead of building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Redirect(String),
    Found(ResolveResult),
}

/// Resolve `target` against a fresh pad and build what it names.
pub fn resolve_artifact(
    target: &RequestTarget,
    config: &ServerConfig,
) -> Result<Resolved, ResolveError> {
    let pad = config.env().new_pad().map_err(ResolveError::Pad)?;
    resolve_artifact_with(target, config, pad.as_ref())
}

/// Resolve `target` against `pad` and build what it names.
///
/// - trailing-slash mismatch: `Redirect`, nothing is built
/// - source found: built synchronously, primary artifact located
/// - no source or no primary artifact: sandboxed join onto the output root
pub fn resolve_artifact_with(
    target: &RequestTarget,
    config: &ServerConfig,
    pad: &dyn Pad,
) -> Result<Resolved, ResolveError> {
    let mut artifact_name = None;
    let mut filename = None;
    let mut record_path = None;
    let mut alt = None;

    match resolve(target, pad) {
        Resolution::Redirect(location) => return Ok(Resolved::Redirect(location)),
        Resolution::Source(source) => {
            let result = trigger::build(&source, config).map_err(ResolveError::Build)?;
            if let Some((name, dst)) = primary_artifact(&result) {
                artifact_name = Some(name);
                filename = Some(dst);
            }
            if let Some(path) = source.record_path() {
                record_path = Some(path.to_string());
                alt = source.alt.clone();
            }
        }
        Resolution::NoSource => {}
    }

    let filename = match filename {
        Some(filename) => filename,
        None => fallback_filename(config.output_path(), target.path())?,
    };

    Ok(Resolved::Found(ResolveResult {
        artifact_name,
        filename,
        record_path,
        alt,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serve::error::LocateError;
    use crate::serve::testing::FakeEnv;
    use crate::site::PRIMARY_ALT;
    use std::path::Path;
    use std::sync::Arc;

    fn config(env: &Arc<FakeEnv>) -> ServerConfig {
        ServerConfig::new(env.clone(), "/srv/out")
    }

    fn found(resolved: Resolved) -> ResolveResult {
        match resolved {
            Resolved::Found(result) => result,
            Resolved::Redirect(location) => panic!("unexpected redirect to {location}"),
        }
    }

    #[test]
    fn test_missing_slash_redirects_without_build() {
        let env = Arc::new(FakeEnv::new().with_record("/foo/"));
        let target = RequestTarget::from_browser("/foo");

        let resolved = resolve_artifact(&target, &config(&env)).unwrap();
        assert_eq!(resolved, Resolved::Redirect("/foo/".into()));
        assert_eq!(env.builds(), 0);
    }

    #[test]
    fn test_exact_match_builds() {
        let env = Arc::new(FakeEnv::new().with_record("/foo/"));
        let target = RequestTarget::from_browser("/foo/");

        let result = found(resolve_artifact(&target, &config(&env)).unwrap());
        assert_eq!(result.artifact_name.as_deref(), Some("foo/index.html"));
        assert_eq!(result.filename, Path::new("/srv/out/foo/index.html"));
        assert_eq!(result.record_path.as_deref(), Some("/foo"));
        assert_eq!(result.alt.as_deref(), Some(PRIMARY_ALT));
        assert_eq!(env.builds(), 1);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let env = Arc::new(FakeEnv::new().with_record("/foo/"));
        let config = config(&env);
        let target = RequestTarget::from_browser("/foo/");

        let first = resolve_artifact(&target, &config).unwrap();
        let second = resolve_artifact(&target, &config).unwrap();
        assert_eq!(first, second);
        assert_eq!(env.builds(), 2);
    }

    #[test]
    fn test_file_source_has_no_record_fields() {
        let env = Arc::new(FakeEnv::new().with_file("/style.css"));
        let target = RequestTarget::from_browser("/style.css");

        let result = found(resolve_artifact(&target, &config(&env)).unwrap());
        assert_eq!(result.artifact_name.as_deref(), Some("style.css"));
        assert_eq!(result.record_path, None);
        assert_eq!(result.alt, None);
    }

    #[test]
    fn test_no_source_uses_fallback() {
        let env = Arc::new(FakeEnv::new());
        let target = RequestTarget::from_browser("/static/app.js");

        let result = found(resolve_artifact(&target, &config(&env)).unwrap());
        assert_eq!(
            result,
            ResolveResult {
                artifact_name: None,
                filename: PathBuf::from("/srv/out/static/app.js"),
                record_path: None,
                alt: None,
            }
        );
        assert_eq!(env.builds(), 0);
    }

    #[test]
    fn test_no_primary_artifact_uses_fallback() {
        let env = Arc::new(FakeEnv::new().with_record("/foo/").without_artifacts());
        let target = RequestTarget::from_browser("/foo/");

        let result = found(resolve_artifact(&target, &config(&env)).unwrap());
        assert_eq!(result.artifact_name, None);
        assert_eq!(result.filename, Path::new("/srv/out/foo"));
        // the source still resolved
        assert_eq!(result.record_path.as_deref(), Some("/foo"));
    }

    #[test]
    fn test_traversal_is_rejected() {
        let env = Arc::new(FakeEnv::new());
        let config = config(&env);

        for raw in [
            "/../../etc/passwd",
            "/%2e%2e/%2e%2e/etc/passwd",
            "/%2E%2E%2F%2E%2E%2Fetc/passwd",
            "/..%5c..%5cetc/passwd",
        ] {
            let target = RequestTarget::from_browser(raw);
            let err = resolve_artifact(&target, &config).unwrap_err();
            assert!(
                matches!(err, ResolveError::Unsafe(LocateError::UnsafeSegment(_))),
                "{raw} was not rejected"
            );
        }
    }

    #[test]
    fn test_build_failure_propagates() {
        let env = Arc::new(FakeEnv::new().with_record("/foo/").failing("bad front matter"));
        let target = RequestTarget::from_browser("/foo/");

        let err = resolve_artifact(&target, &config(&env)).unwrap_err();
        assert!(matches!(err, ResolveError::Build(_)));
        assert_eq!(err.to_string(), "bad front matter");
    }
}
