//! Asset pipeline error types.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a scan, manifest write or asset task.
///
/// A missing directory is not an error anywhere in the pipeline; it is
/// logged and treated as empty.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to scan `{0}`")]
    Scan(PathBuf, #[source] jwalk::Error),

    #[error("IO error at `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to serialize version manifest")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to persist `{0}`")]
    Persist(PathBuf, #[source] std::io::Error),

    /// The new document could not be moved into place and the previous one
    /// could not be put back either; it is left at `backup`.
    #[error("failed to persist `{target}` ({persist}); previous version left at `{backup}`")]
    Restore {
        target: PathBuf,
        backup: PathBuf,
        persist: std::io::Error,
        #[source]
        source: std::io::Error,
    },

    #[error("version manifest write task failed")]
    Join(#[from] tokio::task::JoinError),
}

impl AssetError {
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io(path.into(), err)
    }
}

pub type Result<T, E = AssetError> = std::result::Result<T, E>;
