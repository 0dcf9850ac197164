//! Markdown record rendering.
//!
//! A record file is markdown with optional TOML front matter:
//!
//! ```text
//! +++
//! title = "About"
//! +++
//!
//! # About us
//! ```

use super::PRIMARY_ALT;
use crate::utils::html::escape;
use anyhow::{Context, Result};
use pulldown_cmark::{Options, Parser, html};
use serde::Deserialize;

const FRONT_MATTER_FENCE: &str = "+++";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrontMatter {
    title: Option<String>,
}

/// Render a record file into a standalone HTML page.
pub fn render_record(content: &str, alt: Option<&str>) -> Result<String> {
    let (front_matter, body) = split_front_matter(content)?;

    let mut body_html = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut body_html, Parser::new_ext(body, markdown_options()));

    let title = front_matter
        .title
        .or_else(|| first_heading(body))
        .unwrap_or_default();
    let lang = match alt {
        Some(alt) if alt != PRIMARY_ALT => alt,
        _ => "en",
    };

    Ok(format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n{body_html}</body>\n</html>\n",
        lang = escape(lang),
        title = escape(&title),
    ))
}

fn markdown_options() -> Options {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_FOOTNOTES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    opts
}

fn split_front_matter(content: &str) -> Result<(FrontMatter, &str)> {
    let Some(rest) = content.strip_prefix(FRONT_MATTER_FENCE) else {
        return Ok((FrontMatter::default(), content));
    };
    let Some((raw, body)) = rest.split_once(&format!("\n{FRONT_MATTER_FENCE}")) else {
        return Ok((FrontMatter::default(), content));
    };

    let front_matter = toml::from_str(raw).context("invalid front matter")?;
    Ok((front_matter, body.trim_start_matches(['\r', '\n'])))
}

fn first_heading(body: &str) -> Option<String> {
    body.lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|heading| heading.trim().to_string())
}
