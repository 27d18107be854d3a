//! Content-hash versioning of build outputs for cache busting.
//!
//! Each output `build/js/app.js` is renamed to `build/js/app.<hash>.js` and
//! recorded as `{ version: <hash>, originalPath: build/js/app.js,
//! versionedPath: build/js/app.<hash>.js }`.

use std::fs;

use super::entry::{AssetEntry, VersionManifest};
use super::error::{AssetError, Result};
use super::layout::AssetLayout;
use crate::utils::hash::file_version;
use crate::utils::path::basename;

/// Insert `version` before the last extension of a slash path.
///
/// ```text
/// build/js/app.js      + 1a2b3c4d -> build/js/app.1a2b3c4d.js
/// build/js/lib.min.js  + 1a2b3c4d -> build/js/lib.min.1a2b3c4d.js
/// build/LICENSE        + 1a2b3c4d -> build/LICENSE.1a2b3c4d
/// ```
pub fn versioned_name(slash: &str, version: &str) -> String {
    let name = basename(slash);
    let dir = &slash[..slash.len() - name.len()];
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{dir}{}.{version}{}", &name[..dot], &name[dot..]),
        _ => format!("{dir}{name}.{version}"),
    }
}

/// Hash and rename every output, returning the version records in order.
pub fn version_outputs(
    layout: &AssetLayout,
    outputs: &[String],
    hash_length: usize,
) -> Result<VersionManifest> {
    let mut manifest = VersionManifest::new();
    for output in outputs {
        let path = layout.abs(output);
        let version = file_version(&path, hash_length).map_err(|e| AssetError::io(&path, e))?;
        let versioned = versioned_name(output, &version);
        let target = layout.abs(&versioned);
        fs::rename(&path, &target).map_err(|e| AssetError::io(&path, e))?;

        crate::debug!("version"; "{} -> {}", output, versioned);
        manifest.push(AssetEntry {
            version,
            original_path: output.clone(),
            versioned_path: versioned,
        });
    }
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_versioned_name() {
        assert_eq!(versioned_name("build/js/app.js", "1a2b3c4d"), "build/js/app.1a2b3c4d.js");
        assert_eq!(
            versioned_name("build/js/lib.min.js", "1a2b3c4d"),
            "build/js/lib.min.1a2b3c4d.js"
        );
        assert_eq!(versioned_name("build/LICENSE", "ff"), "build/LICENSE.ff");
        assert_eq!(versioned_name("build/.env", "ff"), "build/.env.ff");
        assert_eq!(versioned_name("app.js", "ff"), "app.ff.js");
    }

    #[test]
    fn test_version_outputs_renames() {
        let dir = TempDir::new().unwrap();
        let layout = AssetLayout::new(dir.path(), "build", "assets", "version.json", vec![]);
        fs::create_dir_all(dir.path().join("build/js")).unwrap();
        fs::write(dir.path().join("build/js/app.js"), "let a=1").unwrap();

        let manifest = version_outputs(&layout, &["build/js/app.js".to_string()], 8).unwrap();
        let entry = &manifest.entries()[0];

        assert_eq!(entry.version.len(), 8);
        assert_eq!(entry.original_path, "build/js/app.js");
        assert_eq!(entry.versioned_path, format!("build/js/app.{}.js", entry.version));
        assert!(!dir.path().join("build/js/app.js").exists());
        assert!(layout.abs(&entry.versioned_path).exists());
    }

    #[test]
    fn test_version_outputs_missing_file() {
        let dir = TempDir::new().unwrap();
        let layout = AssetLayout::new(Path::new(dir.path()), "build", "assets", "v.json", vec![]);
        assert!(version_outputs(&layout, &["build/js/gone.js".to_string()], 8).is_err());
    }
}
