//! Project-relative path layout for the asset pipeline.

use std::path::{Path, PathBuf};

use crate::utils::path::{from_slash, join_slash};

/// Where sources live and where outputs go.
///
/// Every path except `root` is a project-relative slash string, the form
/// used for File Mapping keys and manifest entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    root: PathBuf,
    output: String,
    assets: String,
    version_file: String,
    themes: Vec<String>,
}

impl AssetLayout {
    pub fn new(
        root: &Path,
        output: &str,
        assets: &str,
        version_file: &str,
        themes: Vec<String>,
    ) -> Self {
        Self {
            root: root.to_path_buf(),
            output: output.trim_matches('/').to_string(),
            assets: assets.trim_matches('/').to_string(),
            version_file: version_file.to_string(),
            themes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build-output root, e.g. `build`.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Primary asset root, e.g. `assets`.
    pub fn assets(&self) -> &str {
        &self.assets
    }

    pub fn themes(&self) -> &[String] {
        &self.themes
    }

    pub fn js_dir(&self) -> String {
        join_slash(&[&self.assets, "js"])
    }

    pub fn css_dir(&self) -> String {
        join_slash(&[&self.assets, "css"])
    }

    pub fn out_js(&self) -> String {
        join_slash(&[&self.output, "js"])
    }

    pub fn out_css(&self) -> String {
        join_slash(&[&self.output, "css"])
    }

    /// Version manifest location, e.g. `build/version.json`.
    pub fn manifest_path(&self) -> String {
        join_slash(&[&self.output, &self.version_file])
    }

    /// Absolute filesystem path for a project-relative slash path.
    pub fn abs(&self, slash: &str) -> PathBuf {
        from_slash(&self.root, slash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_dirs() {
        let layout = AssetLayout::new(
            Path::new("/p"),
            "build/",
            "assets",
            "version.json",
            vec!["theme".into()],
        );
        assert_eq!(layout.output(), "build");
        assert_eq!(layout.js_dir(), "assets/js");
        assert_eq!(layout.css_dir(), "assets/css");
        assert_eq!(layout.out_js(), "build/js");
        assert_eq!(layout.out_css(), "build/css");
        assert_eq!(layout.manifest_path(), "build/version.json");
        assert_eq!(
            layout.abs("build/js/a.js"),
            Path::new("/p").join("build").join("js").join("a.js")
        );
    }
}
