//! Built-in task actions.

use crate::asset::minify::JsOptions;
use crate::asset::process::{self, MinifyJob};
use crate::asset::version::version_outputs;
use crate::asset::{AssetError, AssetLayout, FileMapping, persist_manifest};
use crate::config::BuildConfig;
use crate::log;
use crate::logger::ProgressLine;

use super::TaskAction;

/// Processing options shared by all tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskOptions {
    pub drop_console: bool,
    pub hash_length: usize,
    /// Show a progress line while minifying.
    pub progress: bool,
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            drop_console: true,
            hash_length: 8,
            progress: false,
        }
    }
}

impl From<&BuildConfig> for TaskOptions {
    fn from(build: &BuildConfig) -> Self {
        Self {
            drop_console: build.drop_console,
            hash_length: build.hash_length,
            progress: false,
        }
    }
}

/// State a task run reads and writes.
pub struct TaskContext<'a> {
    pub layout: &'a AssetLayout,
    pub options: TaskOptions,
    /// File Mapping used by `copy`.
    pub mapping: &'a mut FileMapping,
    /// Outputs written by the minify tasks, consumed by `version`.
    pub outputs: Vec<String>,
}

impl<'a> TaskContext<'a> {
    pub fn new(layout: &'a AssetLayout, options: TaskOptions, mapping: &'a mut FileMapping) -> Self {
        Self {
            layout,
            options,
            mapping,
            outputs: Vec::new(),
        }
    }

    pub(super) fn execute(&mut self, action: TaskAction) -> Result<(), AssetError> {
        match action {
            TaskAction::Clean => {
                process::clean_outputs(self.layout)?;
            }
            TaskAction::MinifyJs => {
                let jobs = process::primary_jobs(
                    self.layout,
                    &self.layout.js_dir(),
                    &self.layout.out_js(),
                    "js",
                )?;
                self.minify("js", &jobs)?;
            }
            TaskAction::MinifyCss => {
                let jobs = process::primary_jobs(
                    self.layout,
                    &self.layout.css_dir(),
                    &self.layout.out_css(),
                    "css",
                )?;
                self.minify("css", &jobs)?;
            }
            TaskAction::MinifyTheme => {
                let jobs = process::theme_jobs(self.layout)?;
                self.minify("theme", &jobs)?;
            }
            TaskAction::Version => {
                let outputs = std::mem::take(&mut self.outputs);
                let manifest = version_outputs(self.layout, &outputs, self.options.hash_length)?;
                let target = self.layout.abs(&self.layout.manifest_path());
                persist_manifest(&target, &manifest)?;
                log!("version"; "{} assets versioned in {}", manifest.len(), self.layout.manifest_path());
            }
            TaskAction::Copy => {
                let stats = process::copy_mapping(self.layout, self.mapping)?;
                crate::debug!("copy"; "{} written, {} fresh, {} missing", stats.written, stats.fresh, stats.missing);
            }
        }
        Ok(())
    }

    fn minify(&mut self, counter: &'static str, jobs: &[MinifyJob]) -> Result<(), AssetError> {
        let js = JsOptions {
            drop_console: self.options.drop_console,
        };
        let line = self
            .options
            .progress
            .then(|| ProgressLine::new(&[(counter, jobs.len())]));
        let written = process::run_minify(self.layout, jobs, js, line.as_ref().map(|l| (l, counter)))?;
        if let Some(line) = line {
            line.finish();
        }
        self.outputs.extend(written);
        Ok(())
    }
}
