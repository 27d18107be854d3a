//! `clean`: empty the output script and stylesheet directories.

use anyhow::{Context, Result};

use crate::asset::FileMapping;
use crate::config::ProjectConfig;
use crate::log;
use crate::task::{TaskContext, TaskOptions, TaskRunner};

pub fn clean_assets(config: &ProjectConfig) -> Result<()> {
    let layout = config.layout();
    let mut mapping = FileMapping::new();
    let mut ctx = TaskContext::new(&layout, TaskOptions::from(&config.build), &mut mapping);

    TaskRunner::with_builtin()
        .run("clean", &mut ctx)
        .context("clean failed")?;
    log!("clean"; "{} and {} emptied", layout.out_js(), layout.out_css());
    Ok(())
}
