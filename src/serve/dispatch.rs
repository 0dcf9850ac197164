//! Per-request state machine, independent of the HTTP transport.
//!
//! ```text
//! Received ─► Classify ─┬─ admin ───► StripPrefix ─► Delegate
//!                       └─ content ─► Resolve ─┬─► Redirect
//!                                              └─► Build ─► Locate ─┬─► File
//!                                                                   └─► NotFound
//! ```

use super::artifact::{Resolved, resolve_artifact};
use super::error::{LocateError, ResolveError};
use super::locator::servable_file;
use super::router::{AdminRequest, RequestRouter, Route};
use crate::config::ServerConfig;
use crate::core::RequestTarget;
use crate::debug;
use std::path::PathBuf;
use tiny_http::Method;

/// What the transport should answer.
#[derive(Debug)]
pub enum Outcome {
    /// Hand the request to the admin app.
    Delegate(AdminRequest),
    /// Permanent redirect to this target.
    Redirect(String),
    /// Serve this file. Always an existing file below the output root.
    File(PathBuf),
    NotFound,
    /// The request path would leave the output root.
    Forbidden(LocateError),
    /// The content tree or the build failed.
    Failed(ResolveError),
    MethodNotAllowed,
}

impl Outcome {
    /// HTTP status this outcome is answered with. Delegated requests get
    /// their status from the admin app.
    #[cfg(test)]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Delegate(_) => None,
            Self::Redirect(_) => Some(308),
            Self::File(_) => Some(200),
            Self::NotFound => Some(404),
            Self::Forbidden(_) => Some(403),
            Self::Failed(_) => Some(500),
            Self::MethodNotAllowed => Some(405),
        }
    }
}

/// Route one request and, for the content app, resolve and build it.
pub fn dispatch(
    router: &RequestRouter,
    method: &Method,
    target: &RequestTarget,
    config: &ServerConfig,
) -> Outcome {
    if let Route::Admin(request) = router.classify(method, target) {
        return Outcome::Delegate(request);
    }

    if !matches!(method, Method::Get | Method::Head) {
        return Outcome::MethodNotAllowed;
    }

    match resolve_artifact(target, config) {
        Ok(Resolved::Redirect(location)) => Outcome::Redirect(location),
        Ok(Resolved::Found(result)) => {
            debug!(
                "serve";
                "{} -> {} (artifact {:?}, record {:?}, alt {:?})",
                target.path(),
                result.filename.display(),
                result.artifact_name,
                result.record_path,
                result.alt
            );
            match servable_file(config.output_path(), &result.filename) {
                Some(path) => Outcome::File(path),
                None => Outcome::NotFound,
            }
        }
        Err(ResolveError::Unsafe(e)) => Outcome::Forbidden(e),
        Err(e) => Outcome::Failed(e),
    }
}
