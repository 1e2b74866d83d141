//! Core data models used throughout scry.
//!
//! These types describe the files, chunks, and term postings that flow
//! from the indexer into a [`Store`](crate::store::Store), and the chunk
//! views that come back out of it at query time.

use std::path::Path;

use serde::Serialize;

/// Language tag selecting a chunking strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// Go source, chunked by top-level declarations.
    Go,
    /// Markdown, chunked by headings.
    #[serde(rename = "md")]
    Markdown,
}

impl Lang {
    /// Short identifier persisted with every chunk.
    pub fn id(self) -> &'static str {
        match self {
            Self::Go => "go",
            Self::Markdown => "md",
        }
    }

    /// Detect the language from a file extension (case-insensitive).
    ///
    /// Returns `None` for unsupported extensions; such files are
    /// enumerated but never chunked.
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "go" => Some(Self::Go),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// A line-addressed segment produced by the chunker, before addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub file_path: String,
    /// 1-based, inclusive.
    pub start_line: i64,
    /// 1-based, inclusive.
    pub end_line: i64,
    pub text: String,
    pub lang: Lang,
}

/// Persisted state of one indexed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Repo-relative, slash-normalized path. Unique key.
    pub path: String,
    /// SHA-256 of the whole file, hex-encoded.
    pub hash: String,
    /// Modification time as Unix seconds.
    pub mtime: i64,
    /// Size in bytes.
    pub size: i64,
}

/// A content-addressed chunk ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRecord {
    /// [`chunk_digest`](crate::digest::chunk_digest) of the chunk.
    pub id: String,
    pub file_path: String,
    pub start_line: i64,
    pub end_line: i64,
    pub lang: String,
    pub content: String,
}

/// One term posting: `term` occurs `tf` times in chunk `chunk_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRecord {
    pub term: String,
    pub chunk_id: String,
    pub tf: i64,
}

/// A chunk as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkView {
    pub id: String,
    pub file_path: String,
    pub start_line: i64,
    pub end_line: i64,
    pub lang: String,
    pub content: String,
}

/// A posting returned by [`Store::term_hits`](crate::store::Store::term_hits).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermHit {
    pub chunk_id: String,
    pub tf: i64,
}

/// Row counts across the three record kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub files: i64,
    pub chunks: i64,
    pub terms: i64,
}
