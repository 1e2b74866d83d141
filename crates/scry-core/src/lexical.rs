//! Tokenizer and inverted index builder.
//!
//! Text is case-folded to lowercase and split on every character that is
//! not a letter or digit; tokens shorter than two characters are dropped.
//! The same rules tokenize chunk text at index time and queries at search
//! time, so a query term can only match what the indexer recorded.

use std::collections::HashMap;

use crate::models::TermRecord;

/// Minimum token length, in characters, kept by [`tokenize`].
pub const MIN_TOKEN_CHARS: usize = 2;

/// A single term posting produced while indexing one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub term: String,
    pub chunk_id: String,
    pub tf: i64,
}

impl From<Posting> for TermRecord {
    fn from(p: Posting) -> Self {
        TermRecord {
            term: p.term,
            chunk_id: p.chunk_id,
            tf: p.tf,
        }
    }
}

/// Split text into lowercase alphanumeric tokens, keeping duplicates.
///
/// ```rust
/// use scry_core::lexical::tokenize;
///
/// assert_eq!(tokenize("Go, go! 1 a 22."), vec!["go", "go", "22"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

/// In-memory term → postings table for one indexing run.
///
/// Built fresh per run and handed to whoever needs it; nothing is shared
/// between runs.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<Posting>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize `text`, record one posting per distinct term for
    /// `chunk_id`, and return those postings for persistence.
    ///
    /// Postings are returned in first-occurrence order of their term.
    pub fn add(&mut self, chunk_id: &str, text: &str) -> Vec<Posting> {
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, i64> = HashMap::new();
        for term in tokenize(text) {
            let count = counts.entry(term.clone()).or_insert(0);
            if *count == 0 {
                order.push(term);
            }
            *count += 1;
        }

        let postings: Vec<Posting> = order
            .into_iter()
            .map(|term| {
                let tf = counts[&term];
                Posting {
                    term,
                    chunk_id: chunk_id.to_string(),
                    tf,
                }
            })
            .collect();

        for p in &postings {
            self.postings
                .entry(p.term.clone())
                .or_default()
                .push(p.clone());
        }
        postings
    }

    /// Postings recorded so far for `term`.
    pub fn postings(&self, term: &str) -> &[Posting] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct terms seen.
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_rules() {
        assert_eq!(tokenize("Go, go! 1 a 22."), vec!["go", "go", "22"]);
        assert_eq!(tokenize("snake_case-and.dots"), vec!["snake", "case", "and", "dots"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize("a b c ! ?").is_empty());
    }

    #[test]
    fn test_tokenize_unicode_letters() {
        assert_eq!(tokenize("Çalışıyor über"), vec!["çalışıyor", "über"]);
        // Length is measured in characters, not bytes.
        assert_eq!(tokenize("é ü ßx"), vec!["ßx"]);
    }

    #[test]
    fn test_add_counts_term_frequency() {
        let mut idx = InvertedIndex::new();
        let postings = idx.add("c1", "alpha beta beta");
        assert_eq!(postings.len(), 2);

        let tf: HashMap<&str, i64> = postings.iter().map(|p| (p.term.as_str(), p.tf)).collect();
        assert_eq!(tf["alpha"], 1);
        assert_eq!(tf["beta"], 2);
        assert!(postings.iter().all(|p| p.chunk_id == "c1"));

        assert_eq!(idx.postings("alpha").len(), 1);
        assert_eq!(idx.postings("beta").len(), 1);
        assert!(idx.postings("gamma").is_empty());
    }

    #[test]
    fn test_add_accumulates_across_chunks() {
        let mut idx = InvertedIndex::new();
        idx.add("c1", "scan rules");
        idx.add("c2", "scan patterns scan");
        let scan = idx.postings("scan");
        assert_eq!(scan.len(), 2);
        assert_eq!(scan[1].chunk_id, "c2");
        assert_eq!(scan[1].tf, 2);
        assert_eq!(idx.term_count(), 3);
    }

    #[test]
    fn test_add_empty_text() {
        let mut idx = InvertedIndex::new();
        assert!(idx.add("c1", "! ? a").is_empty());
        assert!(idx.is_empty());
    }

    #[test]
    fn test_posting_into_term_record() {
        let rec: TermRecord = Posting {
            term: "scan".into(),
            chunk_id: "c1".into(),
            tf: 3,
        }
        .into();
        assert_eq!(rec.term, "scan");
        assert_eq!(rec.tf, 3);
    }
}
