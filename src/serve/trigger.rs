//! Synchronous build of a resolved source.

use crate::config::ServerConfig;
use crate::logger::Reporter;
use crate::site::{BuildResult, Source};
use anyhow::Result;

/// Build `source` on the calling thread.
///
/// A reporter for the environment is active for exactly the duration of the
/// build. Errors from the builder are returned untouched. Concurrent builds
/// of the same source are the builder's business.
pub fn build(source: &Source, config: &ServerConfig) -> Result<BuildResult> {
    let _reporter = Reporter::enter(config.env().name(), config.verbosity());
    let builder = config
        .env()
        .new_builder(config.output_path(), config.extra_flags());
    builder.build(source)
}
