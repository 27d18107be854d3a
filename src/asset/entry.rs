//! Version records and the source→destination File Mapping.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One version record, serialized verbatim into the version manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetEntry {
    /// Content hash, empty until the versioning task fills it in.
    pub version: String,
    /// Project-relative path as found during scanning.
    pub original_path: String,
    /// Path the file is (or will be) served under.
    pub versioned_path: String,
}

impl AssetEntry {
    /// Unversioned entry.
    pub fn new(original_path: impl Into<String>, versioned_path: impl Into<String>) -> Self {
        Self {
            version: String::new(),
            original_path: original_path.into(),
            versioned_path: versioned_path.into(),
        }
    }
}

/// Ordered version records, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionManifest(Vec<AssetEntry>);

impl VersionManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: AssetEntry) {
        self.0.push(entry);
    }

    pub fn entries(&self) -> &[AssetEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<AssetEntry> for VersionManifest {
    fn from_iter<I: IntoIterator<Item = AssetEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Destination path → ordered source paths that produce it.
///
/// Sources stay ordered because concatenation is order-sensitive. A later
/// insert for an existing destination replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMapping(FxHashMap<String, Vec<String>>);

impl FileMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `dest → sources`, returning the replaced sources if any.
    pub fn insert(&mut self, dest: impl Into<String>, sources: Vec<String>) -> Option<Vec<String>> {
        self.0.insert(dest.into(), sources)
    }

    pub fn get(&self, dest: &str) -> Option<&[String]> {
        self.0.get(dest).map(Vec::as_slice)
    }

    pub fn contains(&self, dest: &str) -> bool {
        self.0.contains_key(dest)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Destination keys, sorted.
    pub fn keys_sorted(&self) -> Vec<&str> {
        let mut keys: Vec<_> = self.0.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
