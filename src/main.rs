//! assetsync - front-end asset pipeline with a versioned manifest.

mod asset;
mod cli;
mod config;
mod core;
mod logger;
mod session;
mod task;
mod utils;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ProjectConfig;

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

    let config = ProjectConfig::load(&cli)?;

    match &cli.command {
        Commands::Build => cli::build::build_assets(&config),
        Commands::Dev { no_watch } => cli::dev::run_dev(&config, *no_watch),
        Commands::Clean => cli::clean::clean_assets(&config),
    }
}
