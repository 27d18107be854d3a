use std::path::PathBuf;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

/// Source roots under watch, each with whether it is currently registered.
///
/// A root missing at startup is logged once and registered later if it
/// shows up; a root that vanishes is registered again when it returns.
pub(super) struct WatchRoots {
    roots: Vec<(PathBuf, bool)>,
}

impl WatchRoots {
    pub(super) fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            roots: paths.into_iter().map(|p| (p, false)).collect(),
        }
    }

    /// Register every root that exists now. Returns how many are watched.
    pub(super) fn attach_existing(&mut self, watcher: &mut RecommendedWatcher) -> notify::Result<usize> {
        for (path, attached) in &mut self.roots {
            if path.is_dir() {
                watcher.watch(path, RecursiveMode::Recursive)?;
                *attached = true;
            } else {
                crate::log!("watch"; "no dir {}", path.display());
            }
        }
        Ok(self.attached())
    }

    pub(super) fn attached(&self) -> usize {
        self.roots.iter().filter(|(_, attached)| *attached).count()
    }

    /// Re-register roots that were recreated since the last check.
    pub(super) fn maintain(&mut self, watcher: &mut RecommendedWatcher) {
        for (path, attached) in &mut self.roots {
            match (*attached, path.is_dir()) {
                (true, false) => *attached = false,
                (false, true) if watcher.watch(path, RecursiveMode::Recursive).is_ok() => {
                    *attached = true;
                    crate::debug!("watch"; "re-attached watch: {}", path.display());
                }
                _ => {}
            }
        }
    }
}
