//! Incremental indexer.
//!
//! # Pipeline
//!
//! ```text
//! enumerate ─▶ keep .go/.md/.markdown ─▶ sort by path ─▶ progress(scan)
//!     ─▶ delete stored paths no longer present
//!     ─▶ for each file: hash ─▶ unchanged? skip
//!                            ─▶ chunk ─▶ address ─▶ postings
//!                            ─▶ replace_file_data ─▶ progress(index)
//! ```
//!
//! A file is re-indexed only when its content digest differs from the
//! stored one, so repeated runs over an unchanged tree write nothing.
//! Any I/O or store failure aborts the run; files already replaced stay
//! replaced and the next run picks up where this one stopped.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

use scry_core::chunk::chunks_for_file;
use scry_core::digest::{chunk_digest, file_digest};
use scry_core::lexical::InvertedIndex;
use scry_core::models::{ChunkRecord, FileRecord, Lang, TermRecord};
use scry_core::store::Store;

use crate::ignore::IgnoreMatcher;
use crate::progress::{IndexProgressEvent, ProgressReporter};
use crate::scan::{self, ScannedFile};

#[derive(Debug, Clone)]
pub struct IndexOptions {
    pub root: PathBuf,
    /// Ignore patterns applied after the repository's pattern files.
    pub extra_ignore: Vec<String>,
}

impl IndexOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extra_ignore: Vec::new(),
        }
    }
}

/// Counts from one indexing run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexSummary {
    /// Eligible files found by the enumerator.
    pub files_scanned: u64,
    /// Files whose index state was replaced.
    pub files_indexed: u64,
    /// Chunks written for those files.
    pub chunks_indexed: u64,
    /// Files skipped because their digest was unchanged.
    pub files_unchanged: u64,
    /// Stored paths removed because they no longer exist.
    pub files_deleted: u64,
}

/// Records for one file, ready for [`Store::replace_file_data`].
struct FileIndex {
    file: FileRecord,
    chunks: Vec<ChunkRecord>,
    terms: Vec<TermRecord>,
}

fn build_file_index(
    scanned: &ScannedFile,
    hash: String,
    text: &str,
    lexicon: &mut InvertedIndex,
) -> FileIndex {
    let rel = scanned.rel_path.as_str();
    let mut chunks = Vec::new();
    let mut terms = Vec::new();

    for chunk in chunks_for_file(rel, text) {
        let id = chunk_digest(&hash, chunk.start_line, chunk.end_line, &chunk.text);
        terms.extend(lexicon.add(&id, &chunk.text).into_iter().map(TermRecord::from));
        chunks.push(ChunkRecord {
            id,
            file_path: rel.to_string(),
            start_line: chunk.start_line,
            end_line: chunk.end_line,
            lang: chunk.lang.id().to_string(),
            content: chunk.text,
        });
    }

    FileIndex {
        file: FileRecord {
            path: rel.to_string(),
            hash,
            mtime: scanned.mtime,
            size: scanned.size,
        },
        chunks,
        terms,
    }
}

/// Bring `store` up to date with the tree at `opts.root`.
pub async fn run_index<S: Store + ?Sized>(
    store: &S,
    opts: &IndexOptions,
    progress: &dyn ProgressReporter,
) -> Result<IndexSummary> {
    if !opts.root.is_dir() {
        bail!("Repository root is not a directory: {}", opts.root.display());
    }
    let matcher = IgnoreMatcher::load(&opts.root, &opts.extra_ignore)?;
    let mut files: Vec<ScannedFile> = scan::list_files(&opts.root, &matcher)?
        .into_iter()
        .filter(|f| Lang::from_path(&f.rel_path).is_some())
        .collect();
    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));

    let mut summary = IndexSummary {
        files_scanned: files.len() as u64,
        ..IndexSummary::default()
    };
    progress.report(IndexProgressEvent::Scan {
        files_total: summary.files_scanned,
    });

    let current: HashSet<&str> = files.iter().map(|f| f.rel_path.as_str()).collect();
    for stale in store.list_files().await? {
        if !current.contains(stale.as_str()) {
            store.delete_file(&stale).await?;
            tracing::info!(file = %stale, "removed deleted file from index");
            summary.files_deleted += 1;
        }
    }

    let mut lexicon = InvertedIndex::new();
    for scanned in &files {
        let bytes = std::fs::read(&scanned.abs_path)
            .with_context(|| format!("Failed to read {}", scanned.abs_path.display()))?;
        let hash = file_digest(&bytes);

        if let Some(existing) = store.get_file(&scanned.rel_path).await? {
            if existing.hash == hash {
                summary.files_unchanged += 1;
                continue;
            }
        }

        let text = String::from_utf8_lossy(&bytes);
        let index = build_file_index(scanned, hash, &text, &mut lexicon);
        store
            .replace_file_data(&index.file, &index.chunks, &index.terms)
            .await?;

        let chunks = index.chunks.len() as u64;
        tracing::debug!(file = %scanned.rel_path, chunks, terms = index.terms.len(), "indexed");
        summary.files_indexed += 1;
        summary.chunks_indexed += chunks;
        progress.report(IndexProgressEvent::Index {
            file: scanned.rel_path.clone(),
            chunks,
        });
    }

    tracing::info!(
        scanned = summary.files_scanned,
        indexed = summary.files_indexed,
        unchanged = summary.files_unchanged,
        deleted = summary.files_deleted,
        distinct_terms = lexicon.term_count(),
        "index run complete"
    );
    Ok(summary)
}
