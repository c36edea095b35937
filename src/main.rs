//! folio - incremental builds and live-reload serving for a static blog.

mod actor;
mod cli;
mod compiler;
mod config;
mod content;
mod core;
mod embed;
mod generator;
mod logger;
mod pipeline;
mod reload;
mod store;
mod utils;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::find_config_file;
use core::Project;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose());

    let project = Project::new(resolve_config(&cli.config)?, cli.overrides());

    match &cli.command {
        Commands::Build { .. } => cli::build::build_site(&project).map(|_| ()),
        Commands::Serve { .. } => cli::serve::serve_site(&project),
    }
}

/// Absolute config path: searched upward from the current directory, or the
/// given path as is when nothing is found so the error names it.
fn resolve_config(config: &std::path::Path) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("cannot read current directory")?;
    Ok(find_config_file(config, &cwd).unwrap_or_else(|| cwd.join(config)))
}
