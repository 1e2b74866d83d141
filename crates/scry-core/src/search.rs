//! Lexical search over the persisted inverted index.
//!
//! # Scoring
//!
//! 1. Tokenize the query with [`lexical::tokenize`].
//! 2. For each distinct query term, fetch its postings from the store.
//! 3. A chunk's score is the sum of its term frequencies over all matched
//!    query terms (no IDF weighting, no length normalization).
//! 4. Fetch the chunk records for every chunk that scored.
//! 5. Sort by score (desc), then file path (asc).
//! 6. Truncate to the limit, if positive.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use serde::Serialize;

use crate::lexical;
use crate::models::ChunkView;
use crate::store::Store;

/// One scored chunk.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub chunk: ChunkView,
    pub score: f64,
}

/// Run a lexical query against `store`.
///
/// A query with no usable tokens, or with no matching postings, returns
/// an empty list rather than an error. `limit <= 0` means unlimited.
pub async fn search<S: Store + ?Sized>(
    store: &S,
    query: &str,
    limit: i64,
) -> Result<Vec<SearchResult>> {
    let terms = lexical::tokenize(query);
    if terms.is_empty() {
        return Ok(Vec::new());
    }

    let mut seen = HashSet::new();
    let mut scores: HashMap<String, f64> = HashMap::new();
    for term in terms.iter().filter(|t| seen.insert(t.as_str())) {
        for hit in store.term_hits(term).await? {
            *scores.entry(hit.chunk_id).or_insert(0.0) += hit.tf as f64;
        }
    }
    scores.retain(|_, score| *score > 0.0);
    if scores.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = scores.keys().cloned().collect();
    let chunks = store.get_chunks_by_ids(&ids).await?;

    let mut results: Vec<SearchResult> = chunks
        .into_iter()
        .filter_map(|chunk| {
            let score = *scores.get(&chunk.id)?;
            Some(SearchResult { chunk, score })
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.chunk.file_path.cmp(&b.chunk.file_path))
    });

    if limit > 0 {
        results.truncate(limit as usize);
    }

    tracing::debug!(query, terms = terms.len(), results = results.len(), "lexical search");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChunkRecord, FileRecord, TermRecord};
    use crate::store::memory::InMemoryStore;

    async fn put(store: &InMemoryStore, path: &str, id: &str, text: &str) {
        let mut index = lexical::InvertedIndex::new();
        let terms: Vec<TermRecord> = index.add(id, text).into_iter().map(Into::into).collect();
        store
            .replace_file_data(
                &FileRecord {
                    path: path.to_string(),
                    hash: format!("h-{id}"),
                    mtime: 0,
                    size: text.len() as i64,
                },
                &[ChunkRecord {
                    id: id.to_string(),
                    file_path: path.to_string(),
                    start_line: 1,
                    end_line: 1,
                    lang: "md".to_string(),
                    content: text.to_string(),
                }],
                &terms,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_summed_tf_scoring_and_order() {
        let store = InMemoryStore::new();
        put(&store, "b.md", "c1", "scan scan ignore").await;
        put(&store, "a.md", "c2", "scan").await;
        put(&store, "c.md", "c3", "unrelated words").await;

        let results = search(&store, "Scan ignore", 0).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.id, "c1");
        assert_eq!(results[0].score, 3.0);
        assert_eq!(results[1].chunk.id, "c2");
        assert_eq!(results[1].score, 1.0);
    }

    #[tokio::test]
    async fn test_ties_break_by_path() {
        let store = InMemoryStore::new();
        put(&store, "z.md", "c1", "scan").await;
        put(&store, "a.md", "c2", "scan").await;
        put(&store, "m.md", "c3", "scan").await;

        let results = search(&store, "scan", 0).await.unwrap();
        let paths: Vec<&str> = results.iter().map(|r| r.chunk.file_path.as_str()).collect();
        assert_eq!(paths, vec!["a.md", "m.md", "z.md"]);
    }

    #[tokio::test]
    async fn test_duplicate_query_terms_count_once() {
        let store = InMemoryStore::new();
        put(&store, "a.md", "c1", "scan").await;
        let results = search(&store, "scan scan SCAN", 0).await.unwrap();
        assert_eq!(results[0].score, 1.0);
    }

    #[tokio::test]
    async fn test_limit_applies_after_sort() {
        let store = InMemoryStore::new();
        put(&store, "a.md", "c1", "scan").await;
        put(&store, "b.md", "c2", "scan scan scan").await;
        put(&store, "c.md", "c3", "scan scan").await;

        let results = search(&store, "scan", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.id, "c2");
        assert_eq!(results[1].chunk.id, "c3");

        assert_eq!(search(&store, "scan", -1).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_query_and_no_hits() {
        let store = InMemoryStore::new();
        put(&store, "a.md", "c1", "scan").await;
        assert!(search(&store, "", 10).await.unwrap().is_empty());
        assert!(search(&store, "a ! ?", 10).await.unwrap().is_empty());
        assert!(search(&store, "missing", 10).await.unwrap().is_empty());
    }
}
