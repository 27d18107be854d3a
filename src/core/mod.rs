//! Core process state shared across commands.

mod state;

pub use state::{set_watching, setup_shutdown_handler, shutdown_signal};
