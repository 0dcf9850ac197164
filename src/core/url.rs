//! Request target type for type-safe URL handling.
//!
//! - `path`: decoded (human-readable), used for routing and resolution
//! - `raw_path`: as received, used when echoing the URL back (redirects)

use percent_encoding::percent_decode_str;

/// A parsed request target (`/path?query`).
///
/// Invariants:
/// - `path` and `raw_path` always start with `/`
/// - `path` has no percent-encoding
/// - fragments are never part of either
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    path: String,
    raw_path: String,
    query: Option<String>,
}

impl RequestTarget {
    /// Parse a target as sent by the browser (percent-encoded, may carry a query).
    pub fn from_browser(encoded: &str) -> Self {
        let without_fragment = encoded.split('#').next().unwrap_or(encoded);
        let (raw, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (without_fragment, None),
        };

        let raw_path = Self::with_leading_slash(raw);
        let decoded = percent_decode_str(&raw_path)
            .decode_utf8()
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| percent_decode_str(&raw_path).decode_utf8_lossy().into_owned());

        Self {
            path: decoded,
            raw_path,
            query,
        }
    }

    fn with_leading_slash(path: &str) -> String {
        if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        }
    }

    /// Decoded path.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path exactly as received.
    #[inline]
    pub fn raw_path(&self) -> &str {
        &self.raw_path
    }

    #[inline]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// The same target with `/` appended to the path, query preserved.
    ///
    /// Leading slashes (and backslashes, which browsers treat alike) collapse
    /// to a single `/`: `//host/` as a `Location` would name another host.
    pub fn with_trailing_slash(&self) -> String {
        let mut location = format!("/{}", self.raw_path.trim_start_matches(['/', '\\']));
        if !location.ends_with('/') {
            location.push('/');
        }
        if let Some(query) = &self.query {
            location.push('?');
            location.push_str(query);
        }
        location
    }
}

/// Look up a parameter in a raw query string (decoded, `+` as space).
pub fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
