//! Storage abstraction for scry.
//!
//! The [`Store`] trait is the narrow, record-oriented capability that the
//! indexer and the search engine depend on. Backends (SQLite in the `scry`
//! crate, [`memory::InMemoryStore`] here) must make the two mutating
//! operations atomic: a reader never observes a file whose chunks or term
//! postings are only partly replaced or partly deleted.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ChunkRecord, ChunkView, FileRecord, StoreStats, TermHit, TermRecord};

/// Abstract storage backend for the file, chunk, and term records.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get_file`](Store::get_file) | Look up a file record by path |
/// | [`list_files`](Store::list_files) | All indexed paths |
/// | [`delete_file`](Store::delete_file) | Cascade-delete terms, chunks, then the file |
/// | [`replace_file_data`](Store::replace_file_data) | Atomically replace a file's index state |
/// | [`get_chunk`](Store::get_chunk) | One chunk by id |
/// | [`get_chunks_by_ids`](Store::get_chunks_by_ids) | Many chunks by id |
/// | [`term_hits`](Store::term_hits) | Postings for one term |
/// | [`stats`](Store::stats) | Record counts |
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch the stored record for `path`, if any.
    async fn get_file(&self, path: &str) -> Result<Option<FileRecord>>;

    /// List every indexed file path.
    async fn list_files(&self) -> Result<Vec<String>>;

    /// Remove the file record for `path` together with all of its chunks
    /// and their term postings, as one unit.
    async fn delete_file(&self, path: &str) -> Result<()>;

    /// Replace everything stored for `file.path` with the given records.
    ///
    /// Prior chunks and postings for the path are discarded, not merged.
    async fn replace_file_data(
        &self,
        file: &FileRecord,
        chunks: &[ChunkRecord],
        terms: &[TermRecord],
    ) -> Result<()>;

    /// Fetch one chunk by identifier.
    async fn get_chunk(&self, id: &str) -> Result<Option<ChunkView>>;

    /// Fetch the chunks whose identifiers are in `ids`. Unknown ids are
    /// skipped; result order is unspecified.
    async fn get_chunks_by_ids(&self, ids: &[String]) -> Result<Vec<ChunkView>>;

    /// All postings for `term`.
    async fn term_hits(&self, term: &str) -> Result<Vec<TermHit>>;

    /// Count files, chunks, and term postings.
    async fn stats(&self) -> Result<StoreStats>;
}
