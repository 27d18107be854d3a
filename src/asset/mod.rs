//! Asset scanning, manifest building and processing.

mod entry;
mod error;
mod layout;
mod manifest;
pub mod minify;
pub mod process;
mod scan;
pub mod version;
mod writer;

// Types
pub use entry::{AssetEntry, FileMapping, VersionManifest};
pub use error::AssetError;
pub use layout::AssetLayout;

// Scanning (read-only)
pub use manifest::build_manifest;

// Persistence
pub use writer::{PendingWrite, persist_manifest, spawn_persist};

#[cfg(test)]
pub use writer::read_manifest;
