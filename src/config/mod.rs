//! Project configuration for `assetsync.toml`.
//!
//! | Section    | Purpose                                            |
//! |------------|----------------------------------------------------|
//! | `[build]`  | Output/asset/theme roots, version file, hashing    |
//! | `[watch]`  | Debounce timing for the dev watch loop             |
//!
//! The config file is optional: with none found, every field takes its
//! default and the current directory is the project root.

mod build;
mod error;
mod util;
mod watch;

pub use build::BuildConfig;
pub use error::ConfigError;
pub use watch::WatchConfig;

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::asset::AssetLayout;
use crate::cli::Cli;
use crate::log;
use crate::utils::hash::MAX_VERSION_LEN;
use crate::utils::path::to_slash;
use util::find_config_file;

/// Root configuration structure representing `assetsync.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

impl ProjectConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from the cwd for the config file. The project root is
    /// the config file's parent directory, or the cwd when there is none.
    pub fn load(cli: &Cli) -> Result<Self> {
        crate::logger::set_verbose(cli.verbose);

        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cwd, &cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                config.config_path = Some(path);
                config
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", cli.config.display());
                Self {
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// CLI flags take precedence over the config file.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(output) = &cli.output {
            self.build.output = output.display().to_string();
        }
        if let Some(assets) = &cli.assets {
            self.build.assets = assets.display().to_string();
        }
    }

    /// Check field values and normalize paths to slash form.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.build.output = normalize_rel("build.output", &self.build.output)?;
        self.build.assets = normalize_rel("build.assets", &self.build.assets)?;
        self.build.themes = self
            .build
            .themes
            .iter()
            .map(|t| normalize_rel("build.themes", t))
            .collect::<Result<_, _>>()?;

        if self.build.output == self.build.assets {
            return Err(ConfigError::validation(
                "build.output",
                format!("must differ from build.assets (`{}`)", self.build.assets),
            ));
        }

        let file = &self.build.version_file;
        if file.is_empty() || file.contains(['/', '\\']) || file == "." || file == ".." {
            return Err(ConfigError::validation(
                "build.version_file",
                format!("`{file}` must be a plain file name"),
            ));
        }

        if !(1..=MAX_VERSION_LEN).contains(&self.build.hash_length) {
            return Err(ConfigError::validation(
                "build.hash_length",
                format!("must be between 1 and {MAX_VERSION_LEN}"),
            ));
        }

        Ok(())
    }

    /// Path layout derived from `[build]`.
    pub fn layout(&self) -> AssetLayout {
        AssetLayout::new(
            &self.root,
            &self.build.output,
            &self.build.assets,
            &self.build.version_file,
            self.build.themes.clone(),
        )
    }
}

/// Normalize a project-relative path to slash form.
fn normalize_rel(field: &'static str, value: &str) -> Result<String, ConfigError> {
    let path = Path::new(value);
    if path.is_absolute() || path.components().any(|c| c == Component::ParentDir) {
        return Err(ConfigError::validation(
            field,
            format!("`{value}` must be relative to the project root"),
        ));
    }
    let slash = to_slash(path)
        .ok_or_else(|| ConfigError::validation(field, format!("`{value}` is not valid UTF-8")))?;
    if slash.is_empty() {
        return Err(ConfigError::validation(field, "must not be empty"));
    }
    Ok(slash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_defaults() {
        let config = ProjectConfig::from_str("").unwrap();
        assert_eq!(config.build, BuildConfig::default());
        assert_eq!(config.watch.debounce_ms, 300);
    }

    #[test]
    fn test_from_str_sections() {
        let config = ProjectConfig::from_str(
            r#"
            [build]
            output = "dist"
            version_file = "assets.json"

            [watch]
            debounce_ms = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.build.output, "dist");
        assert_eq!(config.build.version_file, "assets.json");
        assert_eq!(config.watch.debounce_ms, 50);
    }

    #[test]
    fn test_parse_with_ignored_collects_unknown() {
        let (config, ignored) = ProjectConfig::parse_with_ignored(
            r#"
            [build]
            output = "dist"
            minify_html = true
            "#,
        )
        .unwrap();
        assert_eq!(config.build.output, "dist");
        assert_eq!(ignored, vec!["build.minify_html".to_string()]);
    }

    #[test]
    fn test_validate_normalizes_paths() {
        let mut config = ProjectConfig::default();
        config.build.output = "./build/".into();
        config.build.themes = vec!["./themes/main".into()];
        config.validate().unwrap();
        assert_eq!(config.build.output, "build");
        assert_eq!(config.build.themes, vec!["themes/main".to_string()]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ProjectConfig::default();
        config.build.output = "assets".into();
        assert!(config.validate().is_err());

        let mut config = ProjectConfig::default();
        config.build.version_file = "nested/version.json".into();
        assert!(config.validate().is_err());

        let mut config = ProjectConfig::default();
        config.build.hash_length = 0;
        assert!(config.validate().is_err());

        let mut config = ProjectConfig::default();
        config.build.assets = "../outside".into();
        assert!(config.validate().is_err());

        let mut config = ProjectConfig::default();
        config.build.output = "".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_layout_paths() {
        let mut config = ProjectConfig {
            root: PathBuf::from("/project"),
            ..ProjectConfig::default()
        };
        config.validate().unwrap();
        let layout = config.layout();
        assert_eq!(layout.manifest_path(), "build/version.json");
        assert_eq!(layout.js_dir(), "assets/js");
        assert_eq!(layout.out_css(), "build/css");
    }
}
