//! Command-line interface definitions.

use clap::{ArgAction, ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Quire local development server CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: quire.toml)
    #[arg(short = 'C', long, default_value = "quire.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the development server (builds pages as they are requested)
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        args: ServeArgs,
    },
}

/// Serve command arguments. Each one overrides its `quire.toml` counterpart.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Output directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
    #[arg(short, long)]
    pub interface: Option<std::net::IpAddr>,

    /// Port number to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Language of the admin dashboard
    #[arg(long)]
    pub ui_lang: Option<String>,

    /// Mount point of the admin UI and API
    #[arg(long)]
    pub admin_prefix: Option<String>,

    /// Extra flag passed to the builder (repeatable)
    #[arg(short = 'f', long = "extra-flag", value_name = "FLAG")]
    pub extra_flags: Vec<String>,

    /// Increase verbosity (repeatable: -v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_args() {
        let cli = Cli::parse_from([
            "quire", "serve", "-p", "8000", "-vv", "-f", "force", "-f", "draft", "--ui-lang", "de",
        ]);
        let Commands::Serve { args } = cli.command;
        assert_eq!(args.port, Some(8000));
        assert_eq!(args.verbose, 2);
        assert_eq!(args.extra_flags, vec!["force", "draft"]);
        assert_eq!(args.ui_lang.as_deref(), Some("de"));
        assert_eq!(args.output, None);
    }

    #[test]
    fn test_serve_alias() {
        let cli = Cli::parse_from(["quire", "s", "-o", "dist"]);
        let Commands::Serve { args } = cli.command;
        assert_eq!(args.output, Some(PathBuf::from("dist")));
        assert_eq!(cli.config, PathBuf::from("quire.toml"));
    }
}
