//! Request path to content source resolution.

use crate::core::RequestTarget;
use crate::site::{Pad, Source};

/// Outcome of looking up a request path in the content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A source whose canonical URL matches the request.
    Source(Source),
    /// The source wants a trailing slash; redirect to this target.
    Redirect(String),
    /// Nothing in the content tree matches.
    NoSource,
}

/// Look up `target` in `pad`.
///
/// Mirrors the usual web server trailing-slash normalization: a request for
/// `/blog` whose source lives at `/blog/` is redirected before anything is
/// built, which keeps relative links in the built page correct.
pub fn resolve(target: &RequestTarget, pad: &dyn Pad) -> Resolution {
    match pad.resolve_url_path(target.path()) {
        Some(source) if needs_slash_redirect(target.path(), &source.url_path) => {
            Resolution::Redirect(target.with_trailing_slash())
        }
        Some(source) => Resolution::Source(source),
        None => Resolution::NoSource,
    }
}

/// True when `request_path` lacks the trailing slash its canonical URL has.
pub fn needs_slash_redirect(request_path: &str, canonical: &str) -> bool {
    !request_path.ends_with('/') && canonical != "/" && canonical != request_path
}
