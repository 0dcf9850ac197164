//! The admin application mounted below the admin prefix.

use super::router::AdminRequest;
use crate::config::ServerConfig;
use crate::core::query_param;
use crate::embed::admin::{DASHBOARD_HTML, DashboardVars};
use crate::utils::mime::types::{HTML, JSON, PLAIN};
use serde::Serialize;
use tiny_http::Method;

/// A response produced by the admin app, independent of the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn html(body: String) -> Self {
        Self {
            status: 200,
            content_type: HTML,
            body: body.into_bytes(),
        }
    }

    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self {
                status: 200,
                content_type: JSON,
                body,
            },
            Err(e) => Self::text(500, format!("500 Internal Server Error: {e}")),
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: PLAIN,
            body: body.into().into_bytes(),
        }
    }

    pub fn not_found() -> Self {
        Self::text(404, "404 Not Found")
    }
}

/// An application receiving requests routed below the admin prefix.
///
/// `request.path` is relative to the mount point and always starts with `/`.
pub trait AdminApp: Send + Sync {
    fn handle(&self, request: &AdminRequest, body: &[u8], config: &ServerConfig) -> Reply;
}

/// Built-in dashboard: a page shell for the reserved views plus a small
/// read-only JSON API.
#[derive(Debug, Default, Clone, Copy)]
pub struct Dashboard;

#[derive(Debug, Serialize)]
struct Info<'a> {
    name: &'a str,
    site_root: &'a str,
    output_path: String,
    ui_lang: &'a str,
    verbosity: u8,
    extra_flags: &'a [String],
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct UrlMatch {
    exists: bool,
    path: Option<String>,
    alt: Option<String>,
}

impl AdminApp for Dashboard {
    fn handle(&self, request: &AdminRequest, _body: &[u8], config: &ServerConfig) -> Reply {
        if request.method != Method::Get {
            return Reply::not_found();
        }

        if let Some(view) = request.view() {
            return Reply::html(DASHBOARD_HTML.render(&DashboardVars {
                site_name: config.env().name().to_string(),
                ui_lang: config.ui_lang().to_string(),
                admin_root: request.script_name.clone(),
                view: view.as_str(),
            }));
        }

        match request.path.as_str() {
            "/api/info" => Reply::json(&Info {
                name: config.env().name(),
                site_root: &request.site_root,
                output_path: config.output_path().display().to_string(),
                ui_lang: config.ui_lang(),
                verbosity: config.verbosity(),
                extra_flags: config.extra_flags(),
            }),
            "/api/matchurl" => match_url(request, config),
            _ => Reply::not_found(),
        }
    }
}

/// Look a URL path up in the content tree. Nothing is built.
fn match_url(request: &AdminRequest, config: &ServerConfig) -> Reply {
    let Some(url_path) = query_param(request.query.as_deref(), "url_path") else {
        return Reply::text(400, "400 Bad Request: missing url_path");
    };

    let pad = match config.env().new_pad() {
        Ok(pad) => pad,
        Err(e) => return Reply::text(500, format!("500 Internal Server Error: {e:#}")),
    };

    let found = pad.resolve_url_path(&url_path).and_then(|source| {
        let path = source.record_path()?.to_string();
        Some((path, source.alt))
    });

    Reply::json(&match found {
        Some((path, alt)) => UrlMatch {
            exists: true,
            path: Some(path),
            alt,
        },
        None => UrlMatch {
            exists: false,
            path: None,
            alt: None,
        },
    })
}
