//! Stamp - fingerprint static assets and rewrite their references.

mod cli;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use stamp::{StampConfig, config::find_config_file, debug, logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Collect {
            source,
            output,
            dry_run,
        } => cli::collect::collect(config, source, output, *dry_run),
        Commands::Url { name, root, force } => cli::print_url(config, name, root, *force),
        Commands::ClearCache => cli::clear_cache(&config),
    }
}

fn load_config(cli: &Cli) -> Result<StampConfig> {
    let path = find_config_file(&cli.config);
    match &path {
        Some(path) => debug!("config"; "using {}", path.display()),
        None => debug!("config"; "{} not found, using defaults", cli.config.display()),
    }

    StampConfig::load_or_default(path.as_deref())
        .with_context(|| format!("failed to load {}", cli.config.display()))
}
