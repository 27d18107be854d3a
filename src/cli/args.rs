//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Front-end asset pipeline: minify, version and sync assets while you work
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Output directory path (relative to project root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Primary asset directory path (relative to project root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub assets: Option<PathBuf>,

    /// Config file path (default: assetsync.toml)
    #[arg(short = 'C', long, global = true, default_value = "assetsync.toml", value_hint = clap::ValueHint::FilePath)]
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
    /// Minify and version every asset for production
    #[command(visible_alias = "b")]
    Build,

    /// Sync assets into the output directory and keep them in sync
    #[command(visible_alias = "d")]
    Dev {
        /// Run the session start sequence once and exit
        #[arg(long)]
        no_watch: bool,
    },

    /// Empty the output js and css directories
    #[command(visible_alias = "c")]
    Clean,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dev_with_globals() {
        let cli = Cli::try_parse_from(["assetsync", "dev", "--no-watch", "-v", "-o", "dist"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.output, Some(PathBuf::from("dist")));
        assert_eq!(cli.config, PathBuf::from("assetsync.toml"));
        assert!(matches!(cli.command, Commands::Dev { no_watch: true }));
    }

    #[test]
    fn test_parse_aliases() {
        let cli = Cli::try_parse_from(["assetsync", "b"]).unwrap();
        assert!(matches!(cli.command, Commands::Build));
        let cli = Cli::try_parse_from(["assetsync", "-C", "web.toml", "c"]).unwrap();
        assert!(matches!(cli.command, Commands::Clean));
        assert_eq!(cli.config, PathBuf::from("web.toml"));
    }
}
