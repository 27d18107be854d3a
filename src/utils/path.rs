//! Path helpers.
//!
//! Manifest and mapping keys are project-relative strings with forward
//! slashes (`build/css/site.css`), whatever the host separator is. These
//! helpers convert between that form and real filesystem paths.

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first, then falls back to joining with the
/// current directory.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Render a relative path with `/` separators.
///
/// Returns `None` for non-UTF-8 components. `.` components are dropped.
pub fn to_slash(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            Component::ParentDir => parts.push(".."),
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(parts.join("/"))
}

/// Project-relative slash form of `path`.
///
/// Relative inputs are taken as already project-relative. Absolute inputs
/// must live under `root`.
pub fn rel_slash(root: &Path, path: &Path) -> Option<String> {
    if path.is_relative() {
        return to_slash(path).map(|s| s.replace('\\', "/"));
    }
    let rel = path.strip_prefix(root).ok()?;
    to_slash(rel)
}

/// Last segment of a slash path.
pub fn basename(slash: &str) -> &str {
    slash.rsplit('/').next().unwrap_or(slash)
}

/// Join slash segments, skipping empty ones.
pub fn join_slash(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolve a slash path against the project root.
pub fn from_slash(root: &Path, slash: &str) -> PathBuf {
    slash
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(root.to_path_buf(), |acc, part| acc.join(part))
}

/// Get the modification time of a file.
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// `true` when `a` was modified after `b`, `false` if either is missing.
pub fn is_newer_than(a: &Path, b: &Path) -> bool {
    let (Some(a_time), Some(b_time)) = (get_mtime(a), get_mtime(b)) else {
        return false;
    };
    a_time > b_time
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_slash() {
        let path = Path::new("theme").join("dark").join("css").join("button.css");
        assert_eq!(to_slash(&path).unwrap(), "theme/dark/css/button.css");
        assert_eq!(to_slash(Path::new("./assets/js")).unwrap(), "assets/js");
    }

    #[test]
    fn test_rel_slash_absolute() {
        let root = Path::new("/project");
        let path = root.join("assets").join("js").join("a.js");
        assert_eq!(rel_slash(root, &path).unwrap(), "assets/js/a.js");
        assert!(rel_slash(root, Path::new("/elsewhere/a.js")).is_none());
    }

    #[test]
    fn test_rel_slash_backslashes() {
        let root = Path::new("/project");
        assert_eq!(
            rel_slash(root, Path::new("theme\\light\\css\\c.css")).unwrap(),
            "theme/light/css/c.css"
        );
    }

    #[test]
    fn test_basename_and_join() {
        assert_eq!(basename("theme/dark/css/nested/button.css"), "button.css");
        assert_eq!(basename("button.css"), "button.css");
        assert_eq!(join_slash(&["build/", "css", "", "/b.css"]), "build/css/b.css");
    }

    #[test]
    fn test_from_slash() {
        let root = Path::new("/project");
        assert_eq!(
            from_slash(root, "build/js/a.js"),
            root.join("build").join("js").join("a.js")
        );
    }

    #[test]
    fn test_is_newer_than_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = dir.path().join("a");
        std::fs::write(&a, "x").unwrap();
        assert!(!is_newer_than(&a, &dir.path().join("missing")));
    }
}
