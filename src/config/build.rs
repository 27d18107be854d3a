//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "build"              # Build-output root
//! assets = "assets"             # Primary asset root (js/ and css/ inside)
//! version_file = "version.json" # Written inside the output root
//! themes = ["theme"]            # Extra stylesheet roots, flattened into <output>/css
//! hash_length = 8               # Hex chars kept from each content hash
//! drop_console = true           # Strip console.* calls when minifying JS
//! ```

use serde::{Deserialize, Serialize};

/// Build paths and asset processing options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BuildConfig {
    /// Build-output root, relative to the project root.
    pub output: String,

    /// Primary asset root, relative to the project root.
    pub assets: String,

    /// Version manifest file name inside `output`.
    pub version_file: String,

    /// Theme roots scanned recursively for stylesheets.
    pub themes: Vec<String>,

    /// Number of hex characters kept from each content hash.
    pub hash_length: usize,

    /// Remove `console.*` calls during JS minification.
    pub drop_console: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: "build".into(),
            assets: "assets".into(),
            version_file: "version.json".into(),
            themes: vec!["theme".into()],
            hash_length: 8,
            drop_console: true,
        }
    }
}
