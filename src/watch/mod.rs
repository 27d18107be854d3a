//! Watch loop for `dev`.
//!
//! ```text
//! notify → Debouncer (timing, dedup) → classify (targets) → WatchEvent
//!        → IncrementalUpdater (mapping) → target tasks (copy)
//! ```
//!
//! Runs on the caller's task until Ctrl+C. A batch is handled to the end
//! before the next one is taken, so the mapping is only ever touched from
//! this loop.

mod debouncer;
mod event;
mod roots;
mod target;
mod updater;


pub use event::{ChangeKind, WatchEvent};
pub use target::{WatchTarget, default_targets, match_target};
pub use updater::IncrementalUpdater;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::core::{set_watching, shutdown_signal};
use crate::logger::{status_error, status_success, status_unchanged};
use crate::session::DevSession;
use crate::task::TaskRunner;
use debouncer::Debouncer;
use roots::WatchRoots;

/// How often watch roots that vanished or never existed are re-checked.
const ROOT_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Turn debounced changes into target-tagged events, ordered by path.
///
/// Changes matching no target are dropped.
pub fn classify(
    changes: FxHashMap<PathBuf, ChangeKind>,
    updater: &IncrementalUpdater,
    targets: &[WatchTarget],
) -> Vec<WatchEvent> {
    let mut events: Vec<_> = changes
        .into_iter()
        .filter_map(|(path, kind)| {
            let rel = updater.relative(&path)?;
            let target = match_target(targets, &rel)?;
            Some(WatchEvent::from_change(path, kind, target.name.clone()))
        })
        .collect();
    events.sort_by(|a, b| a.path().cmp(b.path()));
    events
}

/// Apply a batch: update the mapping, then run each touched target's tasks once.
pub fn process_batch(
    session: &mut DevSession,
    runner: &TaskRunner,
    updater: &IncrementalUpdater,
    targets: &[WatchTarget],
    events: &[WatchEvent],
) {
    let mut added = 0;
    for event in events {
        crate::debug!("watch"; "{} {} ({})", event.label(), event.path().display(), event.target());
        if let Some(dest) = updater.handle(event, session.mapping_mut()) {
            crate::debug!("watch"; "mapped {dest}");
            added += 1;
        }
    }

    let mut tasks: Vec<&str> = Vec::new();
    for target in targets {
        if !events.iter().any(|e| e.target() == target.name) {
            continue;
        }
        for task in &target.tasks {
            if !tasks.contains(&task.as_str()) {
                tasks.push(task);
            }
        }
    }

    let mut ran = Vec::new();
    for task in tasks {
        match session.run_task(runner, task) {
            Ok(names) => ran.extend(names),
            Err(err) => {
                status_error(&format!("{task} failed"), &format!("{:#}", anyhow::Error::from(err)));
                return;
            }
        }
    }

    let summary = format!("{} change(s)", events.len());
    match (ran.is_empty(), added) {
        (true, 0) => status_unchanged(&summary),
        (true, added) => status_success(&format!("{summary}, {added} mapped")),
        (false, 0) => status_success(&format!("{summary}, ran {}", ran.join(", "))),
        (false, added) => status_success(&format!("{summary}, {added} mapped, ran {}", ran.join(", "))),
    }
}

/// Watch the asset and theme roots until shutdown.
pub async fn run(session: &mut DevSession, runner: &TaskRunner, debounce: Duration) -> Result<()> {
    let targets = default_targets(session.layout()).context("invalid watch pattern")?;
    let updater = IncrementalUpdater::new(session.layout());

    let (tx, mut rx) = mpsc::unbounded_channel::<notify::Event>();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        match res {
            Ok(event) => {
                let _ = tx.send(event);
            }
            Err(err) => crate::log!("watch"; "notify error: {}", err),
        }
    })
    .context("failed to create file watcher")?;

    let layout = session.layout();
    let mut paths = vec![layout.abs(layout.assets())];
    paths.extend(layout.themes().iter().map(|t| layout.abs(t)));
    let mut roots = WatchRoots::new(paths);
    let attached = roots
        .attach_existing(&mut watcher)
        .context("failed to watch asset directories")?;

    let mut debouncer = Debouncer::new(debounce);
    let mut root_check = tokio::time::interval(ROOT_CHECK_INTERVAL);
    root_check.set_missed_tick_behavior(MissedTickBehavior::Delay);
    set_watching(true);
    crate::log!(
        "watch";
        "watching {} dir(s), {} assets mapped, Ctrl+C to stop",
        attached,
        session.mapping().len()
    );

    loop {
        tokio::select! {
            biased;
            _ = shutdown_signal() => break,
            Some(event) = rx.recv() => debouncer.add_event(&event),
            _ = root_check.tick() => roots.maintain(&mut watcher),
            _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                let Some(changes) = debouncer.take_if_ready() else {
                    continue;
                };
                let events = classify(changes, &updater, &targets);
                if events.is_empty() {
                    continue;
                }
                process_batch(session, runner, &updater, &targets, &events);
            }
        }
    }

    set_watching(false);
    crate::log!("watch"; "stopped");
    Ok(())
}
