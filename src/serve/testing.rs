//! In-memory collaborators for exercising the request core.

use crate::logger::Reporter;
use crate::site::{Artifact, BuildResult, Builder, Environment, Pad, Source, SourceKind};
use anyhow::{Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Shared {
    builds: AtomicUsize,
    seen_verbosity: Mutex<Option<u8>>,
}

/// Environment with a fixed set of record and file URLs.
#[derive(Debug, Clone, Default)]
pub struct FakeEnv {
    records: Vec<String>,
    files: Vec<String>,
    failure: Option<String>,
    write: bool,
    no_artifact: bool,
    shared: Arc<Shared>,
}

impl FakeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record with canonical URL `url_path` (must end with `/`).
    pub fn with_record(mut self, url_path: &str) -> Self {
        self.records.push(url_path.into());
        self
    }

    /// Add a plain file source.
    pub fn with_file(mut self, url_path: &str) -> Self {
        self.files.push(url_path.into());
        self
    }

    /// Every build fails with `message`.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Builds write their artifact to disk.
    pub fn writing(mut self) -> Self {
        self.write = true;
        self
    }

    /// Builds succeed without producing artifacts.
    pub fn without_artifacts(mut self) -> Self {
        self.no_artifact = true;
        self
    }

    pub fn builds(&self) -> usize {
        self.shared.builds.load(Ordering::SeqCst)
    }

    /// Verbosity of the reporter active during the last build.
    pub fn seen_verbosity(&self) -> Option<u8> {
        *self.shared.seen_verbosity.lock().unwrap()
    }
}

impl Environment for FakeEnv {
    fn name(&self) -> &str {
        "fake"
    }

    fn new_pad(&self) -> Result<Box<dyn Pad>> {
        Ok(Box::new(self.clone()))
    }

    fn new_builder(&self, output: &Path, _extra_flags: &[String]) -> Box<dyn Builder> {
        Box::new(FakeBuilder {
            env: self.clone(),
            output: output.to_path_buf(),
        })
    }
}

impl Pad for FakeEnv {
    fn resolve_url_path(&self, url_path: &str) -> Option<Source> {
        if let Some(canonical) = self
            .records
            .iter()
            .find(|r| r.as_str() == url_path || r.trim_end_matches('/') == url_path)
        {
            return Some(record(canonical));
        }
        self.files.iter().find(|f| f.as_str() == url_path).map(|f| Source {
            url_path: f.clone(),
            alt: None,
            kind: SourceKind::File,
            source_file: PathBuf::from(f.trim_start_matches('/')),
        })
    }
}

struct FakeBuilder {
    env: FakeEnv,
    output: PathBuf,
}

impl Builder for FakeBuilder {
    fn build(&self, source: &Source) -> Result<BuildResult> {
        let shared = &self.env.shared;
        shared.builds.fetch_add(1, Ordering::SeqCst);
        *shared.seen_verbosity.lock().unwrap() = Reporter::current().map(|r| r.verbosity());

        if let Some(message) = &self.env.failure {
            bail!("{message}");
        }
        if self.env.no_artifact {
            return Ok(BuildResult::default());
        }

        let relative = source.url_path.trim_start_matches('/');
        let name = if relative.is_empty() || relative.ends_with('/') {
            format!("{relative}index.html")
        } else {
            relative.to_string()
        };
        let dst_filename = self.output.join(&name);

        if self.env.write {
            fs::create_dir_all(dst_filename.parent().unwrap())?;
            fs::write(&dst_filename, format!("built {}", source.url_path))?;
        }

        Ok(BuildResult::new(vec![Artifact { name, dst_filename }]))
    }
}

/// A record source at `url_path`.
pub fn record(url_path: &str) -> Source {
    let path = url_path.trim_end_matches('/');
    Source {
        url_path: url_path.into(),
        alt: Some(crate::site::PRIMARY_ALT.into()),
        kind: SourceKind::Record {
            path: if path.is_empty() { "/".into() } else { path.into() },
        },
        source_file: PathBuf::from("contents.md"),
    }
}
