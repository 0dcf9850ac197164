//! File-backed content tree.
//!
//! # Layout
//!
//! ```text
//! content/
//! ├── contents.md            # record /            url /
//! ├── contents+de.md         # record / (alt de)  url /de/
//! └── blog/
//!     ├── contents.md        # record /blog       url /blog/
//!     └── cover.png          # attachment         url /blog/cover.png
//! assets/
//! └── style.css              # plain source       url /style.css
//! ```
//!
//! Alts without their own `contents+<alt>.md` fall back to `contents.md`.

use super::{Builder, Environment, FsBuilder, Pad, Source, SourceKind};
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

/// Alt identifier of records served without an alt prefix.
pub const PRIMARY_ALT: &str = "_primary";

/// Record file name stem.
const CONTENTS: &str = "contents";

/// Project handle backed by a content and an assets directory.
#[derive(Debug, Clone)]
pub struct FsEnvironment {
    name: String,
    content_dir: PathBuf,
    assets_dir: PathBuf,
    alternatives: Vec<String>,
}

impl FsEnvironment {
    pub fn new(
        name: impl Into<String>,
        content_dir: impl Into<PathBuf>,
        assets_dir: impl Into<PathBuf>,
        alternatives: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content_dir: content_dir.into(),
            assets_dir: assets_dir.into(),
            alternatives,
        }
    }
}

impl Environment for FsEnvironment {
    fn name(&self) -> &str {
        &self.name
    }

    fn new_pad(&self) -> Result<Box<dyn Pad>> {
        if !self.content_dir.is_dir() {
            bail!(
                "content directory `{}` does not exist",
                self.content_dir.display()
            );
        }
        Ok(Box::new(ContentTree {
            content_dir: self.content_dir.clone(),
            assets_dir: self.assets_dir.clone(),
            alternatives: self.alternatives.clone(),
        }))
    }

    fn new_builder(&self, output: &Path, extra_flags: &[String]) -> Box<dyn Builder> {
        Box::new(FsBuilder::new(output, extra_flags))
    }
}

/// Snapshot of the content tree. Lookups go straight to disk.
#[derive(Debug, Clone)]
pub struct ContentTree {
    content_dir: PathBuf,
    assets_dir: PathBuf,
    alternatives: Vec<String>,
}

impl Pad for ContentTree {
    fn resolve_url_path(&self, url_path: &str) -> Option<Source> {
        let trailing_slash = url_path.ends_with('/');
        let mut segments: Vec<&str> = url_path.split('/').filter(|s| !s.is_empty()).collect();

        if segments.iter().any(|s| !is_visible_segment(s)) {
            return None;
        }

        let alt = match segments.first() {
            Some(first) if self.alternatives.iter().any(|a| a == first) => {
                Some(segments.remove(0).to_string())
            }
            _ => None,
        };

        self.resolve_record(&segments, alt.as_deref())
            .or_else(|| {
                if trailing_slash {
                    return None;
                }
                self.resolve_attachment(&segments, alt.as_deref())
            })
            .or_else(|| {
                if trailing_slash || alt.is_some() {
                    return None;
                }
                self.resolve_asset(&segments)
            })
    }
}

impl ContentTree {
    fn resolve_record(&self, segments: &[&str], alt: Option<&str>) -> Option<Source> {
        let dir = join_segments(&self.content_dir, segments);
        let source_file = record_file(&dir, alt)?;

        Some(Source {
            url_path: format!("{}/", url_for(segments, alt).trim_end_matches('/')),
            alt: Some(alt.unwrap_or(PRIMARY_ALT).to_string()),
            kind: SourceKind::Record {
                path: record_path(segments),
            },
            source_file,
        })
    }

    fn resolve_attachment(&self, segments: &[&str], alt: Option<&str>) -> Option<Source> {
        let (file_name, parent) = segments.split_last()?;
        if file_name.starts_with(CONTENTS) {
            return None;
        }

        let parent_dir = join_segments(&self.content_dir, parent);
        record_file(&parent_dir, alt)?;

        let source_file = parent_dir.join(file_name);
        if !source_file.is_file() {
            return None;
        }

        Some(Source {
            url_path: url_for(segments, alt),
            alt: Some(alt.unwrap_or(PRIMARY_ALT).to_string()),
            kind: SourceKind::Record {
                path: record_path(segments),
            },
            source_file,
        })
    }

    fn resolve_asset(&self, segments: &[&str]) -> Option<Source> {
        if segments.is_empty() {
            return None;
        }

        let source_file = join_segments(&self.assets_dir, segments);
        if !source_file.is_file() {
            return None;
        }

        Some(Source {
            url_path: url_for(segments, None),
            alt: None,
            kind: SourceKind::File,
            source_file,
        })
    }
}

/// Segments starting with `.` or `_` are never addressable.
fn is_visible_segment(segment: &str) -> bool {
    !segment.starts_with('.') && !segment.starts_with('_') && !segment.contains('\\')
}

fn join_segments(root: &Path, segments: &[&str]) -> PathBuf {
    segments.iter().fold(root.to_path_buf(), |acc, s| acc.join(s))
}

/// The record file of `dir` for `alt`, falling back to the primary file.
fn record_file(dir: &Path, alt: Option<&str>) -> Option<PathBuf> {
    if let Some(alt) = alt {
        let localized = dir.join(format!("{CONTENTS}+{alt}.md"));
        if localized.is_file() {
            return Some(localized);
        }
    }

    let primary = dir.join(format!("{CONTENTS}.md"));
    primary.is_file().then_some(primary)
}

fn record_path(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}

fn url_for(segments: &[&str], alt: Option<&str>) -> String {
    let mut url = String::from("/");
    if let Some(alt) = alt {
        url.push_str(alt);
        url.push('/');
    }
    url.push_str(&segments.join("/"));
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_tree() -> (TempDir, ContentTree) {
        let temp = TempDir::new().unwrap();
        let content = temp.path().join("content");
        let assets = temp.path().join("assets");

        fs::create_dir_all(content.join("blog/first-post")).unwrap();
        fs::create_dir_all(content.join("_drafts")).unwrap();
        fs::create_dir_all(assets.join("css")).unwrap();

        fs::write(content.join("contents.md"), "# Home").unwrap();
        fs::write(content.join("contents+de.md"), "# Startseite").unwrap();
        fs::write(content.join("blog/contents.md"), "# Blog").unwrap();
        fs::write(content.join("blog/cover.png"), b"png").unwrap();
        fs::write(content.join("blog/first-post/contents.md"), "# First").unwrap();
        fs::write(content.join("_drafts/contents.md"), "# Draft").unwrap();
        fs::write(assets.join("css/style.css"), "body{}").unwrap();

        let tree = ContentTree {
            content_dir: content,
            assets_dir: assets,
            alternatives: vec!["de".into()],
        };
        (temp, tree)
    }

    #[test]
    fn test_resolve_root_record() {
        let (_temp, tree) = make_tree();
        let source = tree.resolve_url_path("/").unwrap();
        assert_eq!(source.url_path, "/");
        assert_eq!(source.record_path(), Some("/"));
        assert_eq!(source.alt.as_deref(), Some(PRIMARY_ALT));
    }

    #[test]
    fn test_resolve_record_canonical_has_slash() {
        let (_temp, tree) = make_tree();
        for path in ["/blog", "/blog/"] {
            let source = tree.resolve_url_path(path).unwrap();
            assert_eq!(source.url_path, "/blog/");
            assert_eq!(source.record_path(), Some("/blog"));
        }

        let nested = tree.resolve_url_path("/blog/first-post/").unwrap();
        assert_eq!(nested.record_path(), Some("/blog/first-post"));
    }

    #[test]
    fn test_resolve_alt() {
        let (_temp, tree) = make_tree();

        let home = tree.resolve_url_path("/de/").unwrap();
        assert_eq!(home.url_path, "/de/");
        assert_eq!(home.alt.as_deref(), Some("de"));
        assert!(home.source_file.ends_with("contents+de.md"));

        // Falls back to the primary contents file
        let blog = tree.resolve_url_path("/de/blog/").unwrap();
        assert_eq!(blog.url_path, "/de/blog/");
        assert_eq!(blog.record_path(), Some("/blog"));
        assert!(blog.source_file.ends_with("blog/contents.md"));
    }

    #[test]
    fn test_resolve_attachment() {
        let (_temp, tree) = make_tree();
        let source = tree.resolve_url_path("/blog/cover.png").unwrap();
        assert_eq!(source.url_path, "/blog/cover.png");
        assert_eq!(source.record_path(), Some("/blog/cover.png"));

        assert!(tree.resolve_url_path("/blog/cover.png/").is_none());
        assert!(tree.resolve_url_path("/blog/contents.md").is_none());
    }

    #[test]
    fn test_resolve_asset() {
        let (_temp, tree) = make_tree();
        let source = tree.resolve_url_path("/css/style.css").unwrap();
        assert_eq!(source.url_path, "/css/style.css");
        assert_eq!(source.kind, SourceKind::File);
        assert_eq!(source.alt, None);

        // Assets are not localized
        assert!(tree.resolve_url_path("/de/css/style.css").is_none());
    }

    #[test]
    fn test_resolve_hidden_and_missing() {
        let (_temp, tree) = make_tree();
        assert!(tree.resolve_url_path("/_drafts/").is_none());
        assert!(tree.resolve_url_path("/../content/").is_none());
        assert!(tree.resolve_url_path("/missing/").is_none());
        assert!(tree.resolve_url_path("/missing.txt").is_none());
    }

    #[test]
    fn test_new_pad_requires_content_dir() {
        let temp = TempDir::new().unwrap();
        let env = FsEnvironment::new("site", temp.path().join("nope"), temp.path(), vec![]);
        assert!(env.new_pad().is_err());
    }
}
