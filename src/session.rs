//! Development session: owns the File Mapping and Version Manifest.
//!
//! ```text
//! start():  clean ─> build_manifest ─> persist (background) ─> copy
//! settle(): wait for the manifest write
//! watch:    Incremental Updater extends the mapping, targets re-run tasks
//! ```
//!
//! Both structures are reset on every [`DevSession::start`]. Watching must
//! only begin after [`DevSession::settle`] so the updater never races the
//! builder.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::asset::{self, AssetLayout, FileMapping, PendingWrite, VersionManifest};
use crate::log;
use crate::task::{TaskContext, TaskError, TaskOptions, TaskRunner};

pub struct DevSession {
    layout: AssetLayout,
    options: TaskOptions,
    mapping: FileMapping,
    manifest: VersionManifest,
    pending: Option<PendingWrite>,
}

impl DevSession {
    pub fn new(layout: AssetLayout, options: TaskOptions) -> Self {
        Self {
            layout,
            options,
            mapping: FileMapping::new(),
            manifest: VersionManifest::new(),
            pending: None,
        }
    }

    pub fn layout(&self) -> &AssetLayout {
        &self.layout
    }

    pub fn mapping(&self) -> &FileMapping {
        &self.mapping
    }

    pub fn mapping_mut(&mut self) -> &mut FileMapping {
        &mut self.mapping
    }

    pub fn manifest(&self) -> &VersionManifest {
        &self.manifest
    }

    /// Run the session start sequence.
    ///
    /// Any write left over from a previous start is joined first. The new
    /// manifest write is dispatched without waiting; call
    /// [`settle`](Self::settle) before watching.
    pub async fn start(&mut self, runner: &TaskRunner) -> Result<()> {
        self.settle().await?;
        self.mapping.clear();
        self.manifest.clear();

        self.run_task(runner, "clean")?;
        log!("dev"; "clean");

        let (mapping, manifest) =
            asset::build_manifest(&self.layout).context("failed to build asset manifest")?;
        self.mapping = mapping;
        self.manifest = manifest;
        if self.manifest.is_empty() {
            log!("dev"; "no assets found");
        }
        for entry in self.manifest.entries() {
            crate::debug!("dev"; "{} -> {}", entry.original_path, entry.versioned_path);
        }

        let target = self.layout.abs(&self.layout.manifest_path());
        self.pending = Some(asset::spawn_persist(target, self.manifest.clone()));

        self.run_task(runner, "copy")?;
        log!("dev"; "{} assets mapped", self.mapping.len());
        Ok(())
    }

    /// Wait for an outstanding manifest write, surfacing its failure.
    pub async fn settle(&mut self) -> Result<Option<PathBuf>> {
        let Some(pending) = self.pending.take() else {
            return Ok(None);
        };
        let path = pending
            .join()
            .await
            .context("failed to write version manifest")?;
        log!("dev"; "{} saved", self.layout.manifest_path());
        Ok(Some(path))
    }

    /// Run a named task against this session's mapping.
    pub fn run_task(&mut self, runner: &TaskRunner, name: &str) -> Result<Vec<String>, TaskError> {
        let mut ctx = TaskContext::new(&self.layout, self.options, &mut self.mapping);
        runner.run(name, &mut ctx)
    }
}
