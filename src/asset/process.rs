//! Asset processing with side effects: cleaning, minifying and copying.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::entry::FileMapping;
use super::error::{AssetError, Result};
use super::layout::AssetLayout;
use super::manifest::flattened_dest;
use super::minify::{JsOptions, is_preminified, minify_by_ext};
use super::scan::{list_files, scan_files, suffix_filter};
use crate::log;
use crate::logger::ProgressLine;
use crate::utils::path::{is_newer_than, join_slash, rel_slash};

/// Result of a mapping copy pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    pub written: usize,
    pub fresh: usize,
    pub missing: usize,
}

/// Empty `<output>/js` and `<output>/css`, keeping the directories.
///
/// Anything else in the output root (including the version manifest) is
/// left alone. Returns the number of removed entries.
pub fn clean_outputs(layout: &AssetLayout) -> Result<usize> {
    let mut removed = 0;
    for dir in [layout.out_js(), layout.out_css()] {
        let dir = layout.abs(&dir);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(AssetError::io(&dir, e)),
        };
        for entry in entries {
            let path = entry.map_err(|e| AssetError::io(&dir, e))?.path();
            let res = if path.is_dir() && !path.is_symlink() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            res.map_err(|e| AssetError::io(&path, e))?;
            removed += 1;
        }
    }
    crate::debug!("clean"; "removed {} entries", removed);
    Ok(removed)
}

/// A single minification job: project-relative source and destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinifyJob {
    pub source: String,
    pub dest: String,
}

/// Jobs for `<src_dir>/*.<ext>` (flat, `*.min.<ext>` excluded) → `<out_dir>/`.
pub fn primary_jobs(layout: &AssetLayout, src_dir: &str, out_dir: &str, ext: &str) -> Result<Vec<MinifyJob>> {
    let mut jobs = Vec::new();
    for path in list_files(&layout.abs(src_dir))? {
        if path.extension().and_then(|e| e.to_str()) != Some(ext) || is_preminified(&path) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        jobs.push(MinifyJob {
            source: join_slash(&[src_dir, name]),
            dest: join_slash(&[out_dir, name]),
        });
    }
    Ok(jobs)
}

/// Jobs for every theme stylesheet (`*.min.css` excluded), flattened into
/// `<output>/css/`.
pub fn theme_jobs(layout: &AssetLayout) -> Result<Vec<MinifyJob>> {
    let out_css = layout.out_css();
    let mut jobs = Vec::new();
    for theme in layout.themes() {
        scan_files(&layout.abs(theme), suffix_filter(".css"), |path| {
            if is_preminified(&path) {
                return;
            }
            if let Some(source) = rel_slash(layout.root(), &path) {
                let dest = flattened_dest(&out_css, &source);
                jobs.push(MinifyJob { source, dest });
            }
        })?;
    }
    Ok(jobs)
}

/// Run minification jobs, returning the written destinations in job order.
///
/// A file the minifier rejects is logged and copied through unchanged.
pub fn run_minify(
    layout: &AssetLayout,
    jobs: &[MinifyJob],
    options: JsOptions,
    progress: Option<(&ProgressLine, &str)>,
) -> Result<Vec<String>> {
    let mut outputs = Vec::with_capacity(jobs.len());
    for job in jobs {
        let source = layout.abs(&job.source);
        let dest = layout.abs(&job.dest);

        let content = fs::read_to_string(&source).map_err(|e| AssetError::io(&source, e))?;
        let minified = minify_by_ext(&source, &content, options).unwrap_or_else(|| {
            log!("minify"; "could not minify {}, copying as-is", job.source);
            content.clone()
        });

        write_file(&dest, minified.as_bytes())?;
        outputs.push(job.dest.clone());

        if let Some((line, counter)) = progress {
            line.inc(counter);
        }
    }
    Ok(outputs)
}

/// Write every mapping destination from its sources, in source order.
///
/// A destination newer than all of its sources is left alone. Destinations
/// whose sources no longer exist are skipped.
pub fn copy_mapping(layout: &AssetLayout, mapping: &FileMapping) -> Result<CopyStats> {
    let mut stats = CopyStats::default();
    if mapping.is_empty() {
        crate::debug!("copy"; "nothing mapped");
        return Ok(stats);
    }

    for dest_key in mapping.keys_sorted() {
        let sources = mapping.get(dest_key).unwrap_or_default();
        let dest = layout.abs(dest_key);
        let source_paths: Vec<_> = sources.iter().map(|s| layout.abs(s)).collect();

        if source_paths.iter().any(|p| !p.exists()) {
            crate::debug!("copy"; "skip {}: source missing", dest_key);
            stats.missing += 1;
            continue;
        }

        if dest.exists() && !source_paths.iter().any(|s| is_newer_than(s, &dest)) {
            stats.fresh += 1;
            continue;
        }

        if let [single] = source_paths.as_slice() {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| AssetError::io(parent, e))?;
            }
            fs::copy(single, &dest).map_err(|e| AssetError::io(single, e))?;
        } else {
            let mut buffer = Vec::new();
            for source in &source_paths {
                buffer.extend(fs::read(source).map_err(|e| AssetError::io(source, e))?);
            }
            write_file(&dest, &buffer)?;
        }
        crate::debug!("copy"; "{}", dest_key);
        stats.written += 1;
    }

    Ok(stats)
}

fn write_file(dest: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| AssetError::io(parent, e))?;
    }
    fs::write(dest, content).map_err(|e| AssetError::io(dest, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, AssetLayout) {
        let dir = TempDir::new().unwrap();
        let layout = AssetLayout::new(dir.path(), "build", "assets", "version.json", vec!["theme".into()]);
        (dir, layout)
    }

    fn write(layout: &AssetLayout, rel: &str, content: &str) {
        write_file(&layout.abs(rel), content.as_bytes()).unwrap();
    }

    #[test]
    fn test_clean_keeps_manifest() {
        let (_dir, layout) = setup();
        write(&layout, "build/js/a.js", "x");
        write(&layout, "build/css/sub/b.css", "x");
        write(&layout, "build/version.json", "[]");

        assert_eq!(clean_outputs(&layout).unwrap(), 2);
        assert!(layout.abs("build/js").is_dir());
        assert!(!layout.abs("build/js/a.js").exists());
        assert!(!layout.abs("build/css/sub").exists());
        assert!(layout.abs("build/version.json").exists());
    }

    #[test]
    fn test_clean_missing_output() {
        let (_dir, layout) = setup();
        assert_eq!(clean_outputs(&layout).unwrap(), 0);
    }

    #[test]
    fn test_primary_jobs_skip_preminified() {
        let (_dir, layout) = setup();
        write(&layout, "assets/js/app.js", "");
        write(&layout, "assets/js/vendor.min.js", "");
        write(&layout, "assets/js/notes.txt", "");

        let jobs = primary_jobs(&layout, "assets/js", "build/js", "js").unwrap();
        assert_eq!(
            jobs,
            vec![MinifyJob {
                source: "assets/js/app.js".into(),
                dest: "build/js/app.js".into(),
            }]
        );
    }

    #[test]
    fn test_theme_jobs_flatten() {
        let (_dir, layout) = setup();
        write(&layout, "theme/dark/css/nested/button.css", "");
        write(&layout, "theme/dark/css/reset.min.css", "");

        let jobs = theme_jobs(&layout).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].source, "theme/dark/css/nested/button.css");
        assert_eq!(jobs[0].dest, "build/css/button.css");
    }

    #[test]
    fn test_run_minify_css() {
        let (_dir, layout) = setup();
        write(&layout, "assets/css/site.css", "body {\n  color: red;\n}\n");

        let jobs = primary_jobs(&layout, "assets/css", "build/css", "css").unwrap();
        let outputs = run_minify(&layout, &jobs, JsOptions::default(), None).unwrap();

        assert_eq!(outputs, ["build/css/site.css"]);
        assert_eq!(fs::read_to_string(layout.abs("build/css/site.css")).unwrap(), "body{color:red}");
    }

    #[test]
    fn test_run_minify_falls_back_on_invalid() {
        let (_dir, layout) = setup();
        write(&layout, "assets/js/broken.js", "function (");

        let jobs = primary_jobs(&layout, "assets/js", "build/js", "js").unwrap();
        run_minify(&layout, &jobs, JsOptions::default(), None).unwrap();
        assert_eq!(fs::read_to_string(layout.abs("build/js/broken.js")).unwrap(), "function (");
    }

    #[test]
    fn test_copy_mapping() {
        let (_dir, layout) = setup();
        write(&layout, "assets/js/a.js", "a");
        write(&layout, "assets/js/b.js", "b");

        let mut mapping = FileMapping::new();
        mapping.insert("build/js/a.js", vec!["assets/js/a.js".into()]);
        mapping.insert("build/js/all.js", vec!["assets/js/b.js".into(), "assets/js/a.js".into()]);
        mapping.insert("build/js/gone.js", vec!["assets/js/gone.js".into()]);

        let stats = copy_mapping(&layout, &mapping).unwrap();
        assert_eq!(stats, CopyStats { written: 2, fresh: 0, missing: 1 });
        assert_eq!(fs::read_to_string(layout.abs("build/js/a.js")).unwrap(), "a");
        assert_eq!(fs::read_to_string(layout.abs("build/js/all.js")).unwrap(), "ba");

        let again = copy_mapping(&layout, &mapping).unwrap();
        assert_eq!(again.written, 0);
        assert_eq!(again.fresh, 2);
    }
}
