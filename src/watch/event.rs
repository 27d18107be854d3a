use std::path::{Path, PathBuf};

/// What happened to a file, as seen after debouncing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
    /// `from` is `None` when the platform reports the new name alone.
    Renamed { from: Option<PathBuf> },
}

impl ChangeKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
            Self::Renamed { .. } => "renamed",
        }
    }
}

/// A qualifying file-system change, tagged with the watch target it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Created { path: PathBuf, target: String },
    Modified { path: PathBuf, target: String },
    Deleted { path: PathBuf, target: String },
    Renamed {
        from: Option<PathBuf>,
        path: PathBuf,
        target: String,
    },
}

impl WatchEvent {
    pub fn from_change(path: PathBuf, kind: ChangeKind, target: String) -> Self {
        match kind {
            ChangeKind::Created => Self::Created { path, target },
            ChangeKind::Modified => Self::Modified { path, target },
            ChangeKind::Removed => Self::Deleted { path, target },
            ChangeKind::Renamed { from } => Self::Renamed { from, path, target },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Created { path, .. }
            | Self::Modified { path, .. }
            | Self::Deleted { path, .. }
            | Self::Renamed { path, .. } => path,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Self::Created { target, .. }
            | Self::Modified { target, .. }
            | Self::Deleted { target, .. }
            | Self::Renamed { target, .. } => target,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Modified { .. } => "modified",
            Self::Deleted { .. } => "deleted",
            Self::Renamed { .. } => "renamed",
        }
    }
}
