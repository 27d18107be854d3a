//! Version manifest persistence.
//!
//! A write goes through a [`ManifestWriteGuard`]: the new document is fully
//! written to a temporary file next to the target before the previous
//! document is touched. The previous document is moved aside, the new one
//! is moved into place, then the old copy is deleted. If the move fails the
//! old copy is put back. Dropping an uncommitted guard discards the
//! temporary file.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tokio::task::JoinHandle;

use super::entry::VersionManifest;
use super::error::{AssetError, Result};

/// Opens write handles for the version manifest.
pub struct ManifestWriter;

impl ManifestWriter {
    /// Prepare a write to `target`, creating its parent directory.
    pub fn acquire(target: &Path) -> Result<ManifestWriteGuard> {
        let parent = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(|e| AssetError::io(parent, e))?;

        let temp = tempfile::Builder::new()
            .prefix(".manifest-")
            .suffix(".tmp")
            .tempfile_in(parent)
            .map_err(|e| AssetError::io(parent, e))?;

        Ok(ManifestWriteGuard {
            target: target.to_path_buf(),
            temp,
        })
    }
}

/// An in-progress manifest write. Nothing at the target changes until
/// [`commit`](Self::commit).
pub struct ManifestWriteGuard {
    target: PathBuf,
    temp: NamedTempFile,
}

impl ManifestWriteGuard {
    /// Replace the document at the target with `manifest`.
    pub fn commit(mut self, manifest: &VersionManifest) -> Result<PathBuf> {
        let json = serde_json::to_vec_pretty(manifest)?;
        let temp_path = self.temp.path().to_path_buf();
        self.temp
            .write_all(&json)
            .and_then(|()| self.temp.as_file().sync_all())
            .map_err(|e| AssetError::io(&temp_path, e))?;

        let backup = backup_path(&self.target);
        let had_prior = match fs::rename(&self.target, &backup) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(AssetError::io(&self.target, e)),
        };

        if let Err(e) = self.temp.persist(&self.target) {
            if had_prior && let Err(restore) = fs::rename(&backup, &self.target) {
                return Err(AssetError::Restore {
                    target: self.target,
                    backup,
                    persist: e.error,
                    source: restore,
                });
            }
            return Err(AssetError::Persist(self.target, e.error));
        }

        if had_prior {
            fs::remove_file(&backup).map_err(|e| AssetError::io(&backup, e))?;
        }

        crate::debug!("version"; "wrote {} entries to {}", manifest.len(), self.target.display());
        Ok(self.target)
    }
}

/// `<target>.prev`, where the previous document waits during a commit.
fn backup_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".prev");
    target.with_file_name(name)
}

/// Acquire and commit in one call.
pub fn persist_manifest(target: &Path, manifest: &VersionManifest) -> Result<PathBuf> {
    ManifestWriter::acquire(target)?.commit(manifest)
}

/// A manifest write running on the blocking pool.
#[must_use = "a pending write must be joined to surface its failure"]
pub struct PendingWrite(JoinHandle<Result<PathBuf>>);

impl PendingWrite {
    /// Wait for the write and surface its outcome.
    pub async fn join(self) -> Result<PathBuf> {
        self.0.await?
    }
}

/// Dispatch a manifest write without waiting for it.
///
/// Must be called from within a tokio runtime.
pub fn spawn_persist(target: PathBuf, manifest: VersionManifest) -> PendingWrite {
    PendingWrite(tokio::task::spawn_blocking(move || {
        persist_manifest(&target, &manifest)
    }))
}

/// Read a persisted manifest back.
#[cfg(test)]
pub fn read_manifest(path: &Path) -> Result<VersionManifest> {
    let json = fs::read(path).map_err(|e| AssetError::io(path, e))?;
    Ok(serde_json::from_slice(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetEntry;
    use tempfile::TempDir;

    fn manifest(paths: &[&str]) -> VersionManifest {
        paths.iter().map(|p| AssetEntry::new(*p, *p)).collect()
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_persist_creates_parent() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("build").join("version.json");

        persist_manifest(&target, &manifest(&["assets/js/a.js"])).unwrap();

        assert_eq!(read_manifest(&target).unwrap(), manifest(&["assets/js/a.js"]));
        assert_eq!(dir_entries(&dir.path().join("build")), ["version.json"]);
    }

    #[test]
    fn test_persist_replaces_previous() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("version.json");

        persist_manifest(&target, &manifest(&["assets/js/old.js"])).unwrap();
        persist_manifest(&target, &manifest(&["assets/js/new.js", "assets/css/b.css"])).unwrap();

        let back = read_manifest(&target).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back.entries()[0].original_path, "assets/js/new.js");
        assert_eq!(dir_entries(dir.path()), ["version.json"]);
    }

    #[test]
    fn test_json_field_names() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("version.json");
        persist_manifest(&target, &manifest(&["assets/css/b.css"])).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "version": "",
                "originalPath": "assets/css/b.css",
                "versionedPath": "assets/css/b.css",
            }])
        );
    }

    #[test]
    fn test_dropped_guard_leaves_target_alone() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("version.json");
        persist_manifest(&target, &manifest(&["assets/js/a.js"])).unwrap();

        let guard = ManifestWriter::acquire(&target).unwrap();
        drop(guard);

        assert_eq!(read_manifest(&target).unwrap(), manifest(&["assets/js/a.js"]));
        assert_eq!(dir_entries(dir.path()), ["version.json"]);
    }

    #[test]
    fn test_failed_persist_restores_previous() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("version.json");
        persist_manifest(&target, &manifest(&["assets/js/a.js"])).unwrap();

        let guard = ManifestWriter::acquire(&target).unwrap();
        // The move-aside succeeds; moving the vanished temp file into place fails.
        fs::remove_file(guard.temp.path()).unwrap();

        let err = guard.commit(&manifest(&["assets/js/b.js"])).unwrap_err();
        assert!(matches!(err, AssetError::Persist(..)));
        assert_eq!(read_manifest(&target).unwrap(), manifest(&["assets/js/a.js"]));
        assert_eq!(dir_entries(dir.path()), ["version.json"]);
    }

    #[test]
    fn test_failed_move_aside_keeps_previous() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("version.json");
        persist_manifest(&target, &manifest(&["assets/js/a.js"])).unwrap();

        let guard = ManifestWriter::acquire(&target).unwrap();
        // A directory squatting on the backup name makes the move-aside fail.
        fs::create_dir(backup_path(&target)).unwrap();
        fs::write(backup_path(&target).join("keep"), "x").unwrap();

        assert!(guard.commit(&manifest(&["assets/js/b.js"])).is_err());
        assert_eq!(read_manifest(&target).unwrap(), manifest(&["assets/js/a.js"]));
    }

    #[test]
    fn test_backup_path() {
        assert_eq!(
            backup_path(Path::new("build/version.json")),
            Path::new("build/version.json.prev")
        );
    }

    #[tokio::test]
    async fn test_spawn_persist_join() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("build").join("version.json");

        let pending = spawn_persist(target.clone(), manifest(&["assets/js/a.js"]));
        assert_eq!(pending.join().await.unwrap(), target);
        assert_eq!(read_manifest(&target).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_spawn_persist_surfaces_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("build");
        fs::write(&blocker, "not a directory").unwrap();

        let pending = spawn_persist(blocker.join("version.json"), manifest(&[]));
        assert!(pending.join().await.is_err());
    }
}
