//! Content tree and build engine seams.
//!
//! The request core only talks to these traits:
//!
//! | Trait         | Role                                             |
//! |---------------|--------------------------------------------------|
//! | `Environment` | Project handle, hands out pads and builders      |
//! | `Pad`         | Snapshot of the content tree, URL -> `Source`    |
//! | `Builder`     | Builds one `Source` into a `BuildResult`         |
//!
//! `FsEnvironment` is the file-backed implementation used by the binary.

mod builder;
mod render;
mod tree;

pub use builder::FsBuilder;
pub use tree::{FsEnvironment, PRIMARY_ALT};

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Project handle shared by every request.
pub trait Environment: Send + Sync {
    /// Short name used by the reporter.
    fn name(&self) -> &str;

    /// Take a fresh snapshot of the content tree.
    fn new_pad(&self) -> Result<Box<dyn Pad>>;

    /// Create a builder writing into `output`.
    fn new_builder(&self, output: &Path, extra_flags: &[String]) -> Box<dyn Builder>;
}

/// Resolves URL paths against a content tree snapshot.
pub trait Pad: Send {
    fn resolve_url_path(&self, url_path: &str) -> Option<Source>;
}

/// Builds sources into artifacts on disk.
pub trait Builder: Send {
    fn build(&self, source: &Source) -> Result<BuildResult>;
}

/// What kind of node a `Source` is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// A structured content record, identified by its record path.
    Record { path: String },
    /// A plain file-backed source (static asset).
    File,
}

/// A node in the content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Canonical URL path.
    pub url_path: String,
    /// Alternate/locale identifier.
    pub alt: Option<String>,
    pub kind: SourceKind,
    /// File the source is read from.
    pub source_file: PathBuf,
}

impl Source {
    /// Record path, if this source is a content record.
    pub fn record_path(&self) -> Option<&str> {
        match &self.kind {
            SourceKind::Record { path } => Some(path),
            SourceKind::File => None,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self.kind, SourceKind::Record { .. })
    }
}

/// One output file of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Output-relative name with `/` separators.
    pub name: String,
    /// Absolute destination path.
    pub dst_filename: PathBuf,
}

/// Artifacts produced by building one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildResult {
    artifacts: Vec<Artifact>,
}

impl BuildResult {
    pub fn new(artifacts: Vec<Artifact>) -> Self {
        Self { artifacts }
    }

    /// The representative artifact: the first one produced.
    pub fn primary_artifact(&self) -> Option<&Artifact> {
        self.artifacts.first()
    }
}
