//! Process-wide lifecycle flags.
//!
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)
//! - `WATCHING`: Is a watch loop running that can stop gracefully?

use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

static WATCHING: AtomicBool = AtomicBool::new(false);

/// Wakes the watch loop on Ctrl+C
static SHUTDOWN_NOTIFY: LazyLock<Notify> = LazyLock::new(Notify::new);

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}

/// Mark whether a watch loop is active
pub fn set_watching(watching: bool) {
    WATCHING.store(watching, Ordering::SeqCst);
}

/// Resolves once Ctrl+C has been received.
pub async fn shutdown_signal() {
    if is_shutdown() {
        return;
    }
    SHUTDOWN_NOTIFY.notified().await;
}

/// Install the global Ctrl+C handler
///
/// - While watching: graceful stop (the watch loop returns)
/// - Otherwise: exit immediately, there is nothing to unwind
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);
        if WATCHING.load(Ordering::SeqCst) {
            crate::log!("watch"; "shutting down...");
            SHUTDOWN_NOTIFY.notify_one();
        } else {
            std::process::exit(0);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}
