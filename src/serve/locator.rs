//! Artifact to filesystem path derivation.
//!
//! Two independent paths:
//! - [`primary_artifact`]: name and destination of a build's primary artifact
//! - [`fallback_filename`]: the request path joined onto the output root
//!   through [`safe_join`]
//!
//! The join is the same on every platform: segments that could climb out of
//! the root are rejected, and the deepest existing part of the joined path is
//! canonicalized and checked against the canonical root so symlinks cannot
//! lead outside either.

use super::error::LocateError;
use crate::site::BuildResult;
use std::path::{Path, PathBuf};

/// Name and destination of the primary artifact, if the build produced one.
pub fn primary_artifact(result: &BuildResult) -> Option<(String, PathBuf)> {
    result
        .primary_artifact()
        .map(|artifact| (artifact.name.clone(), artifact.dst_filename.clone()))
}

/// Map a decoded request path straight onto the output root.
///
/// `/blog/post/` and `blog/post` both become `<root>/blog/post`.
pub fn fallback_filename(output_root: &Path, url_path: &str) -> Result<PathBuf, LocateError> {
    safe_join(output_root, url_path.split('/'))
}

/// Join `segments` onto `root`, refusing anything that would escape it.
///
/// Empty and `.` segments are skipped. Rejected:
/// - `..`
/// - absolute or drive-prefixed segments (`/etc`, `C:`)
/// - segments carrying a separator or NUL (`a\..\b`)
/// - a path whose deepest existing ancestor (itself included) resolves
///   outside the canonical root
pub fn safe_join<'a>(
    root: &Path,
    segments: impl IntoIterator<Item = &'a str>,
) -> Result<PathBuf, LocateError> {
    let mut joined = root.to_path_buf();
    for segment in segments {
        if segment.is_empty() || segment == "." {
            continue;
        }
        if !is_safe_segment(segment) {
            return Err(LocateError::UnsafeSegment(segment.to_string()));
        }
        joined.push(segment);
    }

    let existing = joined
        .ancestors()
        .take_while(|p| p.starts_with(root))
        .find(|p| p.symlink_metadata().is_ok());
    if let Some(existing) = existing
        && !is_within(root, existing)
    {
        return Err(LocateError::OutsideRoot(joined));
    }

    Ok(joined)
}

fn is_safe_segment(segment: &str) -> bool {
    if segment == ".." || segment.contains(['/', '\\', '\0']) {
        return false;
    }

    let bytes = segment.as_bytes();
    let drive_prefixed = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    !drive_prefixed && !Path::new(segment).has_root()
}

/// Canonical containment check. Unresolvable paths count as outside.
fn is_within(root: &Path, path: &Path) -> bool {
    match (root.canonicalize(), path.canonicalize()) {
        (Ok(root), Ok(path)) => path.starts_with(root),
        _ => false,
    }
}

/// The file to serve for `filename`: itself, or `index.html` for a directory.
///
/// Returns `None` when nothing servable exists or the result would leave
/// `output_root` (e.g. an `index.html` symlink pointing elsewhere).
pub fn servable_file(output_root: &Path, filename: &Path) -> Option<PathBuf> {
    let candidate = if filename.is_dir() {
        filename.join("index.html")
    } else {
        filename.to_path_buf()
    };

    (candidate.is_file() && is_within(output_root, &candidate)).then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::Artifact;
    use std::fs;
    use tempfile::TempDir;

    fn make_output() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("public");
        fs::create_dir_all(output.join("blog")).unwrap();
        fs::write(output.join("blog/index.html"), "<h1>Blog</h1>").unwrap();
        fs::write(output.join("robots.txt"), "User-agent: *").unwrap();
        fs::write(temp.path().join("secret.txt"), "secret").unwrap();
        (temp, output)
    }

    #[test]
    fn test_primary_artifact() {
        let result = BuildResult::new(vec![Artifact {
            name: "blog/index.html".into(),
            dst_filename: PathBuf::from("/out/blog/index.html"),
        }]);
        assert_eq!(
            primary_artifact(&result),
            Some((
                "blog/index.html".to_string(),
                PathBuf::from("/out/blog/index.html")
            ))
        );
        assert_eq!(primary_artifact(&BuildResult::default()), None);
    }

    #[test]
    fn test_fallback_strips_slashes() {
        let (_temp, output) = make_output();
        for path in ["/blog/", "blog", "//blog//", "/./blog"] {
            assert_eq!(fallback_filename(&output, path).unwrap(), output.join("blog"));
        }
        assert_eq!(fallback_filename(&output, "/").unwrap(), output);
    }

    #[test]
    fn test_fallback_rejects_traversal() {
        let (_temp, output) = make_output();
        for path in [
            "/../../etc/passwd",
            "/blog/../../secret.txt",
            "..",
            "/a/b/../../..",
            "/..\\secret.txt",
            "/blog/..\\..\\secret.txt",
            "/C:/Windows/win.ini",
            "/nul\0byte",
        ] {
            let result = fallback_filename(&output, path);
            assert!(
                matches!(result, Err(LocateError::UnsafeSegment(_))),
                "{path:?} was not rejected: {result:?}"
            );
        }
    }

    #[test]
    fn test_fallback_never_leaves_root() {
        let (_temp, output) = make_output();
        for path in ["/robots.txt", "/missing/file.html", "/blog/x%2e%2e"] {
            let joined = fallback_filename(&output, path).unwrap();
            assert!(joined.starts_with(&output));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_fallback_rejects_symlink_escape() {
        let (temp, output) = make_output();
        std::os::unix::fs::symlink(temp.path(), output.join("escape")).unwrap();

        let result = fallback_filename(&output, "/escape/secret.txt");
        assert!(matches!(result, Err(LocateError::OutsideRoot(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_fallback_rejects_missing_leaf_below_symlink() {
        let (temp, output) = make_output();
        std::os::unix::fs::symlink(temp.path(), output.join("escape")).unwrap();

        for path in ["/escape/missing.html", "/escape/deeper/missing/page.html"] {
            let result = fallback_filename(&output, path);
            assert!(
                matches!(result, Err(LocateError::OutsideRoot(_))),
                "{path:?} was not rejected: {result:?}"
            );
        }
    }

    #[test]
    fn test_fallback_allows_missing_leaf_inside_root() {
        let (_temp, output) = make_output();
        assert_eq!(
            fallback_filename(&output, "/blog/missing/page.html").unwrap(),
            output.join("blog/missing/page.html")
        );
    }

    #[test]
    fn test_servable_file() {
        let (temp, output) = make_output();

        assert_eq!(
            servable_file(&output, &output.join("blog")),
            Some(output.join("blog").join("index.html"))
        );
        assert_eq!(
            servable_file(&output, &output.join("robots.txt")),
            Some(output.join("robots.txt"))
        );
        assert_eq!(servable_file(&output, &output), None);
        assert_eq!(servable_file(&output, &output.join("missing")), None);
        assert_eq!(servable_file(&output, &temp.path().join("secret.txt")), None);
    }
}
