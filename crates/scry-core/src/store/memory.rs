//! In-memory [`Store`] implementation for tests and ephemeral runs.
//!
//! All state sits behind a single `RwLock`, so each mutating call is
//! observed by readers either entirely or not at all.
//!
//! Chunks and postings are keyed by owning path as well as chunk id:
//! byte-identical files at two paths produce identical chunk ids, and each
//! path keeps its own copy so deleting one never disturbs the other.

use std::collections::{BTreeMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::{ChunkRecord, ChunkView, FileRecord, StoreStats, TermHit, TermRecord};

use super::Store;

#[derive(Default)]
struct Inner {
    files: BTreeMap<String, FileRecord>,
    /// Keyed by `(file_path, chunk_id)`.
    chunks: BTreeMap<(String, String), ChunkRecord>,
    /// `(file_path, posting)` in insertion order.
    terms: Vec<(String, TermRecord)>,
}

impl Inner {
    fn remove_path(&mut self, path: &str) {
        self.terms.retain(|(owner, _)| owner != path);
        self.chunks.retain(|(owner, _), _| owner != path);
        self.files.remove(path);
    }
}

/// In-memory store for testing and indexing runs that are not persisted.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))
    }
}

fn to_view(rec: &ChunkRecord) -> ChunkView {
    ChunkView {
        id: rec.id.clone(),
        file_path: rec.file_path.clone(),
        start_line: rec.start_line,
        end_line: rec.end_line,
        lang: rec.lang.clone(),
        content: rec.content.clone(),
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn get_file(&self, path: &str) -> Result<Option<FileRecord>> {
        Ok(self.read()?.files.get(path).cloned())
    }

    async fn list_files(&self) -> Result<Vec<String>> {
        Ok(self.read()?.files.keys().cloned().collect())
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        self.write()?.remove_path(path);
        Ok(())
    }

    async fn replace_file_data(
        &self,
        file: &FileRecord,
        chunks: &[ChunkRecord],
        terms: &[TermRecord],
    ) -> Result<()> {
        let mut inner = self.write()?;
        inner.remove_path(&file.path);
        inner.files.insert(file.path.clone(), file.clone());
        for c in chunks {
            inner
                .chunks
                .insert((file.path.clone(), c.id.clone()), c.clone());
        }
        inner
            .terms
            .extend(terms.iter().map(|t| (file.path.clone(), t.clone())));
        Ok(())
    }

    async fn get_chunk(&self, id: &str) -> Result<Option<ChunkView>> {
        let inner = self.read()?;
        Ok(inner
            .chunks
            .values()
            .find(|c| c.id == id)
            .map(to_view))
    }

    async fn get_chunks_by_ids(&self, ids: &[String]) -> Result<Vec<ChunkView>> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let inner = self.read()?;
        Ok(inner
            .chunks
            .values()
            .filter(|c| wanted.contains(c.id.as_str()))
            .map(to_view)
            .collect())
    }

    async fn term_hits(&self, term: &str) -> Result<Vec<TermHit>> {
        let inner = self.read()?;
        let mut seen = HashSet::new();
        Ok(inner
            .terms
            .iter()
            .filter(|(_, t)| t.term == term)
            .filter(|(_, t)| seen.insert(t.chunk_id.clone()))
            .map(|(_, t)| TermHit {
                chunk_id: t.chunk_id.clone(),
                tf: t.tf,
            })
            .collect())
    }

    async fn stats(&self) -> Result<StoreStats> {
        let inner = self.read()?;
        Ok(StoreStats {
            files: inner.files.len() as i64,
            chunks: inner.chunks.len() as i64,
            terms: inner.terms.len() as i64,
        })
    }
}
