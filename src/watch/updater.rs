//! Incremental mapping updates during a watch session.
//!
//! Only files new to the primary asset root register anything: `Created`
//! events, and `Renamed` events whose destination is not mapped yet (a file
//! moved in, or an editor's write-then-rename save of a new file). The copy
//! task already re-reads existing sources by path, so a modified, deleted or
//! renamed-over file needs no mapping change. The Version Manifest is never
//! touched here.

use std::path::{Path, PathBuf};

use crate::asset::{AssetLayout, FileMapping};
use crate::utils::path::{join_slash, normalize_path, rel_slash};

use super::event::WatchEvent;

pub struct IncrementalUpdater {
    root: PathBuf,
    canonical_root: PathBuf,
    assets: String,
    output: String,
}

impl IncrementalUpdater {
    pub fn new(layout: &AssetLayout) -> Self {
        Self {
            root: layout.root().to_path_buf(),
            canonical_root: normalize_path(layout.root()),
            assets: layout.assets().to_string(),
            output: layout.output().to_string(),
        }
    }

    /// Project-relative slash form of an event path.
    ///
    /// Watchers may report canonical paths, so both the configured and the
    /// canonical root are tried.
    pub fn relative(&self, path: &Path) -> Option<String> {
        rel_slash(&self.root, path).or_else(|| rel_slash(&self.canonical_root, path))
    }

    /// Apply one event, returning the destination key it added.
    pub fn handle(&self, event: &WatchEvent, mapping: &mut FileMapping) -> Option<String> {
        match event {
            WatchEvent::Created { path, .. } => {
                let (source, dest) = self.destination(path)?;
                if mapping.contains(&dest) {
                    crate::debug!("watch"; "replacing mapping for {dest}");
                }
                mapping.insert(dest.clone(), vec![source]);
                Some(dest)
            }
            WatchEvent::Renamed { path, .. } => {
                let (source, dest) = self.destination(path)?;
                if mapping.contains(&dest) {
                    return None;
                }
                mapping.insert(dest.clone(), vec![source]);
                Some(dest)
            }
            WatchEvent::Modified { .. } | WatchEvent::Deleted { .. } => None,
        }
    }

    /// `<assets>/<rest>` → (`<assets>/<rest>`, `<output>/<rest>`).
    fn destination(&self, path: &Path) -> Option<(String, String)> {
        let source = self.relative(path)?;
        let rest = source.strip_prefix(self.assets.as_str())?.strip_prefix('/')?;
        if rest.is_empty() {
            return None;
        }
        let dest = join_slash(&[&self.output, rest]);
        Some((source, dest))
    }
}
