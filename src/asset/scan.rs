//! Directory scanning.
//!
//! Two primitives: a recursive walk with a path filter ([`scan_files`]) and
//! a flat listing ([`list_files`]). Both treat a missing root as empty and
//! surface every other I/O failure.
//!
//! Symbolic links are never followed, so a link cycle cannot be entered. A
//! link that resolves to a regular file is reported like a file.

use std::fs;
use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};

use super::error::{AssetError, Result};
use crate::log;

/// Walk `root` recursively and call `visit` for every file whose full path
/// passes `filter`.
///
/// Directories are never visited. Entries are sorted by name within each
/// directory. Returns the number of visited files.
pub fn scan_files<F, V>(root: &Path, filter: F, mut visit: V) -> Result<usize>
where
    F: Fn(&Path) -> bool,
    V: FnMut(PathBuf),
{
    if !root.is_dir() {
        log!("scan"; "no dir {}", root.display());
        return Ok(0);
    }

    let walker = WalkDir::new(root)
        .follow_links(false)
        .skip_hidden(false)
        .sort(true)
        .parallelism(Parallelism::Serial);

    let mut count = 0;
    for entry in walker {
        let entry = entry.map_err(|e| AssetError::Scan(root.to_path_buf(), e))?;
        let path = entry.path();
        if !is_file_entry(entry.file_type(), &path) || !filter(&path) {
            continue;
        }
        visit(path);
        count += 1;
    }

    crate::debug!("scan"; "{}: {} file(s)", root.display(), count);
    Ok(count)
}

/// List the files directly inside `dir`, sorted by name.
///
/// Subdirectories are skipped.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        log!("scan"; "no dir {}", dir.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| AssetError::io(dir, e))? {
        let entry = entry.map_err(|e| AssetError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| AssetError::io(&path, e))?;
        if is_file_entry(file_type, &path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Filter matching paths that end with `suffix` (e.g. `.css`).
pub fn suffix_filter(suffix: &'static str) -> impl Fn(&Path) -> bool {
    move |path| path.to_str().is_some_and(|s| s.ends_with(suffix))
}

fn is_file_entry(file_type: fs::FileType, path: &Path) -> bool {
    if file_type.is_symlink() {
        return path.is_file();
    }
    file_type.is_file()
}
