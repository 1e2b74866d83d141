//! Stages 1 and 2: drop candidates that mention no question term, then
//! prefer candidates that mention several.

use super::Candidate;

/// Lowercased, non-empty terms.
fn normalized(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Number of distinct `terms` occurring in `text` (case-insensitive
/// substring match).
pub fn distinct_term_match_count(text: &str, terms: &[String]) -> usize {
    let lower = text.to_lowercase();
    let mut terms = normalized(terms);
    terms.sort();
    terms.dedup();
    terms.iter().filter(|t| lower.contains(t.as_str())).count()
}

/// Keep only candidates whose text contains at least one term.
///
/// An empty term list keeps nothing.
pub fn filter_by_query_terms(candidates: Vec<Candidate>, terms: &[String]) -> Vec<Candidate> {
    if normalized(terms).is_empty() {
        return Vec::new();
    }
    candidates
        .into_iter()
        .filter(|c| distinct_term_match_count(&c.chunk.content, terms) > 0)
        .collect()
}

/// Record each candidate's distinct match count, then keep the strong
/// candidates (two or more distinct terms) if any exist, otherwise the
/// weak ones (exactly one).
pub fn apply_match_preference(candidates: Vec<Candidate>, terms: &[String]) -> Vec<Candidate> {
    let counted: Vec<Candidate> = candidates
        .into_iter()
        .map(|mut c| {
            c.match_count = distinct_term_match_count(&c.chunk.content, terms);
            c
        })
        .collect();

    let min = if counted.iter().any(|c| c.match_count >= 2) { 2 } else { 1 };
    counted.into_iter().filter(|c| c.match_count >= min).collect()
}
