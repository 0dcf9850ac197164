//! File-backed build engine.
//!
//! Records render to `<output>/<url>/index.html`, attachments and assets are
//! copied to `<output>/<url>`. An artifact at least as new as its source is
//! left untouched, so rebuilding an unchanged source is a no-op.

use super::render::render_record;
use super::{Artifact, BuildResult, Builder, Source};
use crate::logger::{report_artifact, report_source};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Extra flag that disables the freshness check.
const FLAG_FORCE: &str = "force";

#[derive(Debug, Clone)]
pub struct FsBuilder {
    output: PathBuf,
    extra_flags: Vec<String>,
}

impl FsBuilder {
    pub fn new(output: &Path, extra_flags: &[String]) -> Self {
        Self {
            output: output.to_path_buf(),
            extra_flags: extra_flags.to_vec(),
        }
    }

    fn has_flag(&self, flag: &str) -> bool {
        self.extra_flags.iter().any(|f| f == flag)
    }

    /// Output-relative artifact name for a canonical URL path.
    fn artifact_name(url_path: &str) -> String {
        let relative = url_path.trim_start_matches('/');
        if relative.is_empty() || relative.ends_with('/') {
            format!("{relative}index.html")
        } else {
            relative.to_string()
        }
    }

    fn artifact_for(&self, source: &Source) -> Artifact {
        let name = Self::artifact_name(&source.url_path);
        let dst_filename = name
            .split('/')
            .fold(self.output.clone(), |acc, segment| acc.join(segment));
        Artifact { name, dst_filename }
    }

    fn write_artifact(&self, source: &Source, artifact: &Artifact) -> Result<()> {
        if let Some(parent) = artifact.dst_filename.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let is_page = source.is_record() && source.url_path.ends_with('/');
        let written = if is_page {
            let markdown = fs::read_to_string(&source.source_file)
                .with_context(|| format!("Failed to read {}", source.source_file.display()))?;
            let html = render_record(&markdown, source.alt.as_deref())
                .with_context(|| format!("Failed to render {}", source.source_file.display()))?;
            fs::write(&artifact.dst_filename, html)
        } else {
            fs::copy(&source.source_file, &artifact.dst_filename).map(|_| ())
        };
        written.with_context(|| format!("Failed to write {}", artifact.dst_filename.display()))
    }
}

impl Builder for FsBuilder {
    fn build(&self, source: &Source) -> Result<BuildResult> {
        report_source(&source.url_path);

        let artifact = self.artifact_for(source);
        let fresh = !self.has_flag(FLAG_FORCE)
            && is_output_fresh(&artifact.dst_filename, get_mtime(&source.source_file));

        if !fresh {
            self.write_artifact(source, &artifact)?;
        }
        report_artifact(&artifact.name, fresh);

        Ok(BuildResult::new(vec![artifact]))
    }
}

/// Check if output file is at least as new as the source mtime
fn is_output_fresh(output: &Path, source_mtime: Option<SystemTime>) -> bool {
    let Some(source_time) = source_mtime else {
        return false;
    };

    output
        .metadata()
        .and_then(|m| m.modified())
        .map(|output_time| output_time >= source_time)
        .unwrap_or(false)
}

fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}
