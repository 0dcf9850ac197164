//! Request resolution errors.

use std::path::PathBuf;
use thiserror::Error;

/// A fallback path that would leave the output directory.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocateError {
    #[error("path segment `{0}` is not allowed")]
    UnsafeSegment(String),

    #[error("`{}` resolves outside the output directory", .0.display())]
    OutsideRoot(PathBuf),
}

/// Why a request path could not be resolved to a file.
///
/// Content tree and build errors are carried as-is; their `Display` and
/// `source()` are those of the underlying error.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Unsafe(#[from] LocateError),

    #[error(transparent)]
    Pad(anyhow::Error),

    #[error(transparent)]
    Build(anyhow::Error),
}
