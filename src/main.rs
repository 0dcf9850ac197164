//! quire - development server for a static site content tree.
//!
//! Requests are resolved against the content tree, the matching source is
//! built on demand and the resulting artifact is served from the output
//! directory. An admin app is mounted below a configurable prefix.

mod cli;
mod config;
mod core;
mod embed;
mod logger;
mod serve;
mod site;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{QuireConfig, ServerConfig};
use std::sync::Arc;

fn main() -> Result<()> {
    // Before any blocking operation
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }

    let config = QuireConfig::load(&cli)?;
    logger::set_verbosity(config.verbosity);

    match &cli.command {
        Commands::Serve { .. } => serve(&config),
    }
}

fn serve(config: &QuireConfig) -> Result<()> {
    if let Some(path) = &config.config_path {
        debug!("serve"; "config {}", path.display());
    }

    std::fs::create_dir_all(&config.build.output)?;
    let server_config = Arc::new(ServerConfig::from_config(config));
    debug!("serve"; "{:?}", server_config);

    let bound = cli::serve::bind_server(config.serve.interface, config.serve.port, server_config)?;
    bound.run()
}
