use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::EventKind;
use notify::event::{ModifyKind, RenameMode};
use rustc_hash::FxHashMap;

use super::event::ChangeKind;

pub(super) const REBUILD_COOLDOWN_MS: u64 = 100;

/// Pure debouncer: only handles timing and event deduplication.
pub(super) struct Debouncer {
    /// Path → ChangeKind (dedup is free via HashMap key uniqueness)
    pub(super) changes: FxHashMap<PathBuf, ChangeKind>,
    pub(super) last_event: Option<Instant>,
    pub(super) last_flush: Option<Instant>,
    debounce: Duration,
}

impl Debouncer {
    pub(super) fn new(debounce: Duration) -> Self {
        Self {
            changes: FxHashMap::default(),
            last_event: None,
            last_flush: None,
            debounce,
        }
    }

    /// Add a notify event, applying dedup rules:
    /// - Removed + Created/Modified → Created/Modified (file was restored)
    /// - Modified + Removed → Removed (file was deleted)
    /// - Created + Removed → dropped (appeared and vanished)
    /// - otherwise: first event wins
    pub(super) fn add_event(&mut self, event: &notify::Event) {
        let changes: Vec<(PathBuf, ChangeKind)> = match event.kind {
            EventKind::Create(_) => with_kind(&event.paths, ChangeKind::Created),
            EventKind::Remove(_) => with_kind(&event.paths, ChangeKind::Removed),
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => match event.paths.as_slice() {
                [from, to] => vec![
                    (from.clone(), ChangeKind::Removed),
                    (to.clone(), ChangeKind::Renamed { from: Some(from.clone()) }),
                ],
                _ => return,
            },
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                with_kind(&event.paths, ChangeKind::Removed)
            }
            // Rename target without a paired source
            EventKind::Modify(ModifyKind::Name(_)) => {
                with_kind(&event.paths, ChangeKind::Renamed { from: None })
            }
            // Ignore metadata-only changes (mtime/atime/chmod noise)
            EventKind::Modify(ModifyKind::Metadata(_)) => return,
            EventKind::Modify(_) => with_kind(&event.paths, ChangeKind::Modified),
            _ => return,
        };

        crate::debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);

        for (path, kind) in changes {
            if is_temp_file(&path) {
                continue;
            }
            self.record(path, kind);
        }
    }

    fn record(&mut self, path: PathBuf, kind: ChangeKind) {
        let Some(existing) = self.changes.get(&path) else {
            crate::debug!("watch"; "event {}: {}", kind.label(), path.display());
            self.changes.insert(path, kind);
            self.last_event = Some(Instant::now());
            return;
        };

        let transition = match (existing, &kind) {
            (ChangeKind::Removed, ChangeKind::Created | ChangeKind::Modified) => Transition::Restore,
            (ChangeKind::Modified, ChangeKind::Removed) => Transition::Delete,
            (ChangeKind::Created, ChangeKind::Removed) => Transition::Discard,
            _ => return,
        };

        match transition {
            Transition::Restore => {
                crate::debug!("watch"; "restore removed->{}: {}", kind.label(), path.display());
                self.changes.insert(path, kind);
            }
            Transition::Delete => {
                crate::debug!("watch"; "upgrade modified->removed: {}", path.display());
                self.changes.insert(path, ChangeKind::Removed);
            }
            Transition::Discard => {
                crate::debug!("watch"; "discard created+removed: {}", path.display());
                self.changes.remove(&path);
            }
        }
        self.last_event = Some(Instant::now());
    }

    /// Take raw changes if debounce + cooldown elapsed.
    pub(super) fn take_if_ready(&mut self) -> Option<FxHashMap<PathBuf, ChangeKind>> {
        if !self.is_ready() {
            return None;
        }

        let changes = std::mem::take(&mut self.changes);
        self.last_event = None;
        self.last_flush = Some(Instant::now());
        Some(changes)
    }

    pub(super) fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };

        if last_event.elapsed() < self.debounce {
            return false;
        }

        if let Some(last_flush) = self.last_flush
            && last_flush.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS)
        {
            return false;
        }

        !self.changes.is_empty()
    }

    /// Precise sleep duration until next possible ready time.
    pub(super) fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };

        let debounce_remaining = self.debounce.saturating_sub(last_event.elapsed());

        let cooldown_remaining = self
            .last_flush
            .map(|t| Duration::from_millis(REBUILD_COOLDOWN_MS).saturating_sub(t.elapsed()))
            .unwrap_or(Duration::ZERO);

        debounce_remaining
            .max(cooldown_remaining)
            .max(Duration::from_millis(1))
    }
}

/// How a second event for an already-recorded path changes it.
enum Transition {
    Restore,
    Delete,
    Discard,
}

fn with_kind(paths: &[PathBuf], kind: ChangeKind) -> Vec<(PathBuf, ChangeKind)> {
    paths.iter().map(|p| (p.clone(), kind.clone())).collect()
}

/// Check if path is a temp/backup file (editor artifacts).
pub(super) fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}
