//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Stamp static assets with content fingerprints
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "stamp.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Copy a static tree and publish fingerprinted copies of every file
    #[command(visible_alias = "c")]
    Collect {
        /// Directory holding the original assets
        #[arg(value_hint = clap::ValueHint::DirPath)]
        source: PathBuf,

        /// Directory the assets are served from
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output: PathBuf,

        /// Report what would be collected without writing anything
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Print the served URL of one asset
    #[command(visible_alias = "u")]
    Url {
        /// Logical asset name, e.g. `css/window.css#frag`
        name: String,

        /// Directory the assets are served from
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        root: PathBuf,

        /// Hash even when `debug = true`
        #[arg(short, long)]
        force: bool,
    },

    /// Remove the persisted name cache
    ClearCache,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_collect() {
        let cli = Cli::parse_from(["stamp", "-v", "collect", "static", "-o", "public", "-n"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Collect {
                source,
                output,
                dry_run,
            } => {
                assert_eq!(source, PathBuf::from("static"));
                assert_eq!(output, PathBuf::from("public"));
                assert!(dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_url_with_global_config() {
        let cli = Cli::parse_from(["stamp", "url", "css/a.css", "-r", "public", "-C", "site.toml"]);
        assert_eq!(cli.config, PathBuf::from("site.toml"));
        assert!(matches!(cli.command, Commands::Url { force: false, .. }));
    }
}
