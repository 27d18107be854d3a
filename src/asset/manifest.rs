//! Manifest building: scan asset roots into a File Mapping and an ordered
//! Version Manifest.
//!
//! ```text
//! assets/js/a.js          -> build/js/a.js    (location kept)
//! assets/css/b.css        -> build/css/b.css  (location kept)
//! theme/light/css/c.css   -> build/css/c.css  (flattened)
//! ```
//!
//! Primary assets are listed flat. Theme roots are walked recursively and
//! every stylesheet lands directly in the output CSS directory.

use super::entry::{AssetEntry, FileMapping, VersionManifest};
use super::error::Result;
use super::layout::AssetLayout;
use super::scan::{list_files, scan_files, suffix_filter};
use crate::utils::path::{basename, join_slash, rel_slash};

/// Scan every configured root and produce the mapping plus version records.
///
/// Discovery order is primary JS, primary CSS, then each theme root in
/// configuration order.
pub fn build_manifest(layout: &AssetLayout) -> Result<(FileMapping, VersionManifest)> {
    let mut mapping = FileMapping::new();
    let mut manifest = VersionManifest::new();

    for (src_dir, out_dir) in [
        (layout.js_dir(), layout.out_js()),
        (layout.css_dir(), layout.out_css()),
    ] {
        add_primary(layout, &src_dir, &out_dir, &mut mapping, &mut manifest)?;
    }

    for theme in layout.themes() {
        add_theme(layout, theme, &mut mapping, &mut manifest)?;
    }

    crate::debug!("manifest"; "{} entries, {} destinations", manifest.len(), mapping.len());
    Ok((mapping, manifest))
}

/// Flat listing of one primary asset directory.
fn add_primary(
    layout: &AssetLayout,
    src_dir: &str,
    out_dir: &str,
    mapping: &mut FileMapping,
    manifest: &mut VersionManifest,
) -> Result<()> {
    for path in list_files(&layout.abs(src_dir))? {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let source = join_slash(&[src_dir, name]);
        mapping.insert(join_slash(&[out_dir, name]), vec![source.clone()]);
        manifest.push(AssetEntry::new(source.clone(), source));
    }
    Ok(())
}

/// Recursive stylesheet scan of one theme root, flattened into the output
/// CSS directory.
fn add_theme(
    layout: &AssetLayout,
    theme: &str,
    mapping: &mut FileMapping,
    manifest: &mut VersionManifest,
) -> Result<()> {
    let out_css = layout.out_css();
    scan_files(&layout.abs(theme), suffix_filter(".css"), |path| {
        let Some(source) = rel_slash(layout.root(), &path) else {
            return;
        };
        let dest = flattened_dest(&out_css, &source);
        mapping.insert(dest.clone(), vec![source.clone()]);
        manifest.push(AssetEntry::new(source, dest));
    })?;
    Ok(())
}

/// `<out_css>/<basename>` for a theme source.
pub fn flattened_dest(out_css: &str, source: &str) -> String {
    join_slash(&[out_css, basename(source)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn layout(root: &Path) -> AssetLayout {
        AssetLayout::new(root, "build", "assets", "version.json", vec!["theme".into()])
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    #[test]
    fn test_end_to_end_three_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "assets/js/a.js");
        touch(dir.path(), "assets/css/b.css");
        touch(dir.path(), "theme/light/css/c.css");

        let (mapping, manifest) = build_manifest(&layout(dir.path())).unwrap();

        let originals: Vec<_> = manifest.entries().iter().map(|e| e.original_path.as_str()).collect();
        assert_eq!(originals, ["assets/js/a.js", "assets/css/b.css", "theme/light/css/c.css"]);
        assert_eq!(mapping.keys_sorted(), ["build/css/b.css", "build/css/c.css", "build/js/a.js"]);
        assert_eq!(mapping.get("build/js/a.js").unwrap(), ["assets/js/a.js"]);
        assert_eq!(mapping.get("build/css/c.css").unwrap(), ["theme/light/css/c.css"]);
    }

    #[test]
    fn test_entry_paths_and_versions() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "assets/js/a.js");
        touch(dir.path(), "theme/light/css/c.css");

        let (_, manifest) = build_manifest(&layout(dir.path())).unwrap();
        let entries = manifest.entries();

        assert!(entries.iter().all(|e| e.version.is_empty()));
        assert_eq!(entries[0].versioned_path, "assets/js/a.js");
        assert_eq!(entries[1].original_path, "theme/light/css/c.css");
        assert_eq!(entries[1].versioned_path, "build/css/c.css");
    }

    #[test]
    fn test_theme_files_are_flattened() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "theme/dark/css/nested/button.css");
        touch(dir.path(), "theme/dark/css/nested/deeper/card.css");

        let (mapping, _) = build_manifest(&layout(dir.path())).unwrap();

        assert_eq!(
            mapping.get("build/css/button.css").unwrap(),
            ["theme/dark/css/nested/button.css"]
        );
        for dest in mapping.keys_sorted() {
            let rest = dest.strip_prefix("build/css/").unwrap();
            assert!(!rest.contains('/'), "{dest} not flattened");
        }
    }

    #[test]
    fn test_count_matches_discovered_files() {
        let dir = TempDir::new().unwrap();
        for rel in [
            "assets/js/a.js",
            "assets/js/b.js",
            "assets/css/site.css",
            "theme/dark/css/d.css",
            "theme/light/css/l.css",
            "theme/light/notes.txt",
        ] {
            touch(dir.path(), rel);
        }

        let (mapping, manifest) = build_manifest(&layout(dir.path())).unwrap();
        assert_eq!(manifest.len(), 5);
        assert_eq!(mapping.len(), 5);
    }

    #[test]
    fn test_missing_roots_yield_nothing() {
        let dir = TempDir::new().unwrap();
        let (mapping, manifest) = build_manifest(&layout(dir.path())).unwrap();
        assert!(mapping.is_empty());
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_theme_collision_last_write_wins() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "assets/css/site.css");
        touch(dir.path(), "theme/dark/css/site.css");

        let (mapping, manifest) = build_manifest(&layout(dir.path())).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("build/css/site.css").unwrap(), ["theme/dark/css/site.css"]);
    }

    #[test]
    fn test_flattened_dest() {
        assert_eq!(
            flattened_dest("build/css", "theme/dark/css/nested/button.css"),
            "build/css/button.css"
        );
    }
}
