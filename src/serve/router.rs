//! Routing between the admin app and the content app.
//!
//! The content app answers every path, so mounting the admin app by prefix
//! alone would let a `POST /admin/...` that no admin route accepts fall
//! through to content resolution. Classification therefore happens here,
//! before either app sees the request:
//!
//! ```text
//! GET|POST|PUT <prefix>/<rest>  → admin app, with path /<rest>
//! anything else                 → content app
//! ```

use crate::core::RequestTarget;
use tiny_http::Method;

/// Methods the admin mount accepts.
pub const ADMIN_METHODS: [Method; 3] = [Method::Get, Method::Post, Method::Put];

/// Client-side views of the admin dashboard.
///
/// These are only route metadata: they make `<prefix>/<view>` a known URL
/// (for link building and recognition) and never run a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminView {
    Edit,
    Delete,
    Preview,
    AddChild,
    Upload,
}

impl AdminView {
    pub const ALL: [Self; 5] = [
        Self::Edit,
        Self::Delete,
        Self::Preview,
        Self::AddChild,
        Self::Upload,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Preview => "preview",
            Self::AddChild => "add-child",
            Self::Upload => "upload",
        }
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|view| view.as_str() == segment)
    }
}

/// A request handed to the admin app.
///
/// `script_name` is the mount point (site root plus the stripped prefix),
/// `path` what remains below it. `script_name + path` is the original path.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminRequest {
    pub method: Method,
    /// Site root of the outer app, before any prefix was stripped.
    pub site_root: String,
    pub script_name: String,
    pub path: String,
    pub query: Option<String>,
}

impl AdminRequest {
    /// The reserved dashboard view this request addresses, if any.
    pub fn view(&self) -> Option<AdminView> {
        self.path
            .strip_prefix('/')
            .and_then(AdminView::from_segment)
    }
}

/// Which application owns a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Admin(AdminRequest),
    Content,
}

#[derive(Debug, Clone)]
pub struct RequestRouter {
    admin_prefix: String,
    site_root: String,
}

impl RequestRouter {
    /// `admin_prefix` must be normalized (`/admin`); the site root is empty
    /// when the server is mounted at `/`.
    pub fn new(admin_prefix: impl Into<String>, site_root: impl Into<String>) -> Self {
        Self {
            admin_prefix: admin_prefix.into(),
            site_root: site_root.into(),
        }
    }

    /// Decide which app handles the request.
    ///
    /// Method and prefix are checked before anything else, so the content
    /// app's catch-all never sees admin paths with an admin method.
    pub fn classify(&self, method: &Method, target: &RequestTarget) -> Route {
        if !ADMIN_METHODS.contains(method) {
            return Route::Content;
        }
        let Some(rest) = self.admin_rest(target.path()) else {
            return Route::Content;
        };

        let (consumed, remaining) = strip_prefix(target.path(), rest);
        Route::Admin(AdminRequest {
            method: method.clone(),
            site_root: self.site_root.clone(),
            script_name: format!("{}{}", self.site_root, consumed),
            path: remaining.to_string(),
            query: target.query().map(str::to_string),
        })
    }

    /// `<rest>` of `<prefix>/<rest>`. Like a `path` route converter, `rest`
    /// must be non-empty and must not start with `/`.
    fn admin_rest<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.admin_prefix.as_str())?.strip_prefix('/')?;
        (!rest.is_empty() && !rest.starts_with('/')).then_some(rest)
    }

    /// URL of a dashboard view.
    pub fn url_for_view(&self, view: AdminView) -> String {
        format!("{}{}/{}", self.site_root, self.admin_prefix, view.as_str())
    }
}

/// Pop leading segments off `path` until exactly `/<rest>` remains.
///
/// Returns `(consumed, remaining)` with `consumed + remaining == path`.
///
/// # Panics
///
/// If `path` runs out before `/<rest>` is reached. The caller derived
/// `rest` from the same route table, so this means the outer and inner
/// route tables disagree about the prefix length: a bug, never bad input.
pub fn strip_prefix<'a>(path: &'a str, rest: &str) -> (&'a str, &'a str) {
    let target = format!("/{rest}");
    let mut split = 0;

    while &path[split..] != target {
        let remaining = &path[split..];
        assert!(
            !remaining.is_empty(),
            "router prefix stripping overran: `{path}` never reached `{target}`"
        );
        split += pop_segment_len(remaining);
    }

    (&path[..split], &path[split..])
}

/// Length of the first segment of `path` including its leading slashes.
fn pop_segment_len(path: &str) -> usize {
    let body = path.trim_start_matches('/');
    let leading = path.len() - body.len();
    leading + body.find('/').unwrap_or(body.len())
}
