//! Content addressing.
//!
//! Files are identified by the SHA-256 of their raw bytes; chunks by the
//! SHA-256 of `"{file_digest}:{start}:{end}:\n"` followed by the exact
//! chunk text. Both functions are pure, so re-indexing byte-identical
//! content reproduces byte-identical identifiers.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a whole file.
pub fn file_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Hex-encoded SHA-256 identifying one chunk of a file.
///
/// Any change to the file digest, the line range, or the text yields a
/// different identifier.
pub fn chunk_digest(file_digest: &str, start_line: i64, end_line: i64, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}:{}:\n", file_digest, start_line, end_line).as_bytes());
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
