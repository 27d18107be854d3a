//! Content hashing for asset versions.
//!
//! Versions are the leading hex characters of a blake3 digest, so the same
//! bytes always produce the same version on every platform.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Longest version string a blake3 digest can provide.
pub const MAX_VERSION_LEN: usize = 64;

/// Hash a file's content, streaming it in chunks.
pub fn hash_file(path: &Path) -> io::Result<blake3::Hash> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 8192];
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(hasher.finalize())
}

/// Truncate a digest to a `len`-char hex fingerprint.
///
/// `len` is clamped to `1..=MAX_VERSION_LEN`.
pub fn fingerprint(hash: &blake3::Hash, len: usize) -> String {
    let len = len.clamp(1, MAX_VERSION_LEN);
    let mut hex = hex::encode(hash.as_bytes());
    hex.truncate(len);
    hex
}

/// Version string for the file at `path`.
pub fn file_version(path: &Path, len: usize) -> io::Result<String> {
    hash_file(path).map(|h| fingerprint(&h, len))
}
