//! HTTP response writers.

use crate::config::ServerConfig;
use crate::serve::{Outcome, Reply};
use crate::utils::mime::types::{HTML, PLAIN};
use anyhow::{Context, Result, anyhow};
use std::error::Error;
use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Answer a content-app outcome. Returns the status sent.
pub fn respond(request: Request, outcome: Outcome, config: &ServerConfig) -> Result<u16> {
    match outcome {
        Outcome::File(path) => respond_file(request, &path),
        Outcome::Redirect(location) => respond_redirect(request, &location),
        Outcome::NotFound => respond_not_found(request, config),
        Outcome::Forbidden(_) => send_body(request, 403, PLAIN, b"403 Forbidden".to_vec()),
        Outcome::MethodNotAllowed => respond_method_not_allowed(request),
        Outcome::Failed(e) => respond_build_error(request, &e),
        Outcome::Delegate(_) => Err(anyhow!("admin request reached the content responder")),
    }
}

/// Send a reply produced by the admin app.
pub fn send_reply(request: Request, reply: Reply) -> Result<u16> {
    send_body(request, reply.status, reply.content_type, reply.body)
}

/// Respond with 503 while shutting down.
pub fn respond_unavailable(request: Request) -> Result<u16> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

fn respond_file(request: Request, path: &Path) -> Result<u16> {
    let content_type = crate::utils::mime::from_path(path);

    if is_head_request(&request) {
        return send_head(request, 200, content_type);
    }

    if let Some(range) = get_range_header(&request) {
        return respond_range(request, path, content_type, &range);
    }

    let body = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    send_body(request, 200, content_type, body)
}

/// Serve one byte range (media seeking). Multi-range requests get the whole file.
fn respond_range(
    request: Request,
    path: &Path,
    content_type: &'static str,
    range: &str,
) -> Result<u16> {
    let file_size = fs::metadata(path)?.len();

    let Some(spec) = range.trim().strip_prefix("bytes=").filter(|s| !s.contains(',')) else {
        let body = fs::read(path)?;
        return send_body(request, 200, content_type, body);
    };

    let Some((start, end)) = parse_range(spec, file_size) else {
        let response = Response::empty(StatusCode(416))
            .with_header(header("Content-Range", &format!("bytes */{file_size}"))?);
        request.respond(response)?;
        return Ok(416);
    };

    let length = end - start + 1;
    let mut file = fs::File::open(path)?;
    file.seek(SeekFrom::Start(start))?;

    let response = Response::new(
        StatusCode(206),
        vec![
            header("Content-Type", content_type)?,
            header("Content-Range", &format!("bytes {start}-{end}/{file_size}"))?,
            header("Accept-Ranges", "bytes")?,
        ],
        file.take(length),
        usize::try_from(length).ok(),
        None,
    );
    request.respond(response)?;
    Ok(206)
}

/// Parse `start-end`, `start-` or `-suffix` into an inclusive byte range.
fn parse_range(spec: &str, file_size: u64) -> Option<(u64, u64)> {
    let (start, end) = spec.split_once('-')?;
    let (start, end) = (start.trim(), end.trim());
    let last = file_size.checked_sub(1)?;

    let (start, end) = match (start.is_empty(), end.is_empty()) {
        (false, false) => (start.parse().ok()?, end.parse::<u64>().ok()?.min(last)),
        (false, true) => (start.parse().ok()?, last),
        (true, false) => {
            let suffix: u64 = end.parse().ok()?;
            if suffix == 0 {
                return None;
            }
            (file_size.saturating_sub(suffix), last)
        }
        (true, true) => return None,
    };

    (start <= end).then_some((start, end))
}

fn get_range_header(request: &Request) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case("range"))
        .map(|h| h.value.to_string())
}

fn respond_redirect(request: Request, location: &str) -> Result<u16> {
    let response = Response::from_string(format!("308 Permanent Redirect: {location}"))
        .with_status_code(StatusCode(308))
        .with_header(header("Location", location)?)
        .with_header(header("Content-Type", PLAIN)?);
    request.respond(response)?;
    Ok(308)
}

/// 404 using `<output>/404.html` when the site has one.
fn respond_not_found(request: Request, config: &ServerConfig) -> Result<u16> {
    let custom_404 = config.output_path().join("404.html");
    let has_custom = custom_404.is_file();

    if is_head_request(&request) {
        return send_head(request, 404, if has_custom { HTML } else { PLAIN });
    }

    if has_custom
        && let Ok(body) = fs::read(&custom_404)
    {
        return send_body(request, 404, HTML, body);
    }

    send_body(request, 404, PLAIN, b"404 Not Found".to_vec())
}

fn respond_method_not_allowed(request: Request) -> Result<u16> {
    let response = Response::from_string("405 Method Not Allowed")
        .with_status_code(StatusCode(405))
        .with_header(header("Allow", "GET, HEAD")?)
        .with_header(header("Content-Type", PLAIN)?);
    request.respond(response)?;
    Ok(405)
}

fn respond_build_error(request: Request, error: &(dyn Error + 'static)) -> Result<u16> {
    let chain = error_chain(error);
    let msg = crate::utils::html::escape(&chain);
    let body = format!("<html><body><h1>Build Error</h1><pre>{msg}</pre></body></html>");
    send_body(request, 500, HTML, body.into_bytes())
}

/// `error` followed by each of its causes.
fn error_chain(error: &(dyn Error + 'static)) -> String {
    let mut chain = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push_str("\n\ncaused by: ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<u16> {
    let response = Response::empty(StatusCode(status)).with_header(header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(status)
}

fn send_body(request: Request, status: u16, content_type: &'static str, body: Vec<u8>) -> Result<u16> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(status)
}

fn header(key: &'static str, value: &str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid `{key}` header value: {value}"))
}
