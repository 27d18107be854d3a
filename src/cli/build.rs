//! `build`: clean, minify, then version every output.

use anyhow::{Context, Result};

use crate::asset::FileMapping;
use crate::config::ProjectConfig;
use crate::log;
use crate::task::{TaskContext, TaskOptions, TaskRunner};

pub fn build_assets(config: &ProjectConfig) -> Result<()> {
    let layout = config.layout();
    let options = TaskOptions {
        progress: true,
        ..TaskOptions::from(&config.build)
    };
    let mut mapping = FileMapping::new();
    let mut ctx = TaskContext::new(&layout, options, &mut mapping);

    let ran = TaskRunner::with_builtin()
        .run("build", &mut ctx)
        .context("build failed")?;
    crate::debug!("build"; "ran {}", ran.join(", "));
    log!("build"; "done, manifest at {}", layout.manifest_path());
    Ok(())
}
