//! `dev`: start a session, then watch until Ctrl+C.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::ProjectConfig;
use crate::session::DevSession;
use crate::task::{TaskOptions, TaskRunner};
use crate::watch;

pub fn run_dev(config: &ProjectConfig, no_watch: bool) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(dev_session(config, no_watch))
}

async fn dev_session(config: &ProjectConfig, no_watch: bool) -> Result<()> {
    let runner = TaskRunner::with_builtin();
    let mut session = DevSession::new(config.layout(), TaskOptions::from(&config.build));

    session.start(&runner).await?;
    session.settle().await?;
    crate::log!("dev"; "{} assets versioned", session.manifest().len());

    if no_watch {
        return Ok(());
    }
    watch::run(
        &mut session,
        &runner,
        Duration::from_millis(config.watch.debounce_ms),
    )
    .await
}
