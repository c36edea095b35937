//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::config::ConfigOverrides;

/// folio static blog generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "config.yaml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the site for production
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Start development server with live reload
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        serve_args: ServeArgs,
    },
}

/// Build command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Minify the HTML content
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Override the public base URL.
    ///
    /// Useful for CI deployments where the production URL differs from the
    /// one in config.yaml.
    #[arg(short = 'U', long = "base-url", value_hint = clap::ValueHint::Url)]
    pub base_url: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Serve command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
    #[arg(short, long)]
    pub interface: Option<IpAddr>,

    /// Port number to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable file watching for auto-rebuild
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub watch: Option<bool>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    pub const fn verbose(&self) -> bool {
        match &self.command {
            Commands::Build { build_args } => build_args.verbose,
            Commands::Serve { serve_args } => serve_args.verbose,
        }
    }

    /// Config overrides given on the command line.
    pub fn overrides(&self) -> ConfigOverrides {
        match &self.command {
            Commands::Build { build_args } => ConfigOverrides {
                minify: build_args.minify,
                base_url: build_args.base_url.clone(),
                ..Default::default()
            },
            Commands::Serve { serve_args } => ConfigOverrides {
                interface: serve_args.interface,
                port: serve_args.port,
                watch: serve_args.watch,
                ..Default::default()
            },
        }
    }
}
