//! Stages 5 and 6: deterministic ordering and top-N selection.

use std::cmp::Ordering;

use super::Candidate;

/// Sort by score descending, then file path ascending, then start line
/// ascending. Equal inputs always produce the same order.
pub fn sort_candidates(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.chunk.file_path.cmp(&b.chunk.file_path))
            .then_with(|| a.chunk.start_line.cmp(&b.chunk.start_line))
    });
    candidates
}

/// First `n` candidates. Non-positive `n` selects none.
pub fn select_top_evidence(mut candidates: Vec<Candidate>, n: i64) -> Vec<Candidate> {
    if n <= 0 {
        return Vec::new();
    }
    candidates.truncate(n as usize);
    candidates
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{cand, cand_at};
    use super::*;

    fn ids(cs: &[Candidate]) -> Vec<&str> {
        cs.iter().map(|c| c.chunk.id.as_str()).collect()
    }

    #[test]
    fn test_sort_score_then_path_then_line() {
        let out = sort_candidates(vec![
            cand_at("a", "b.go", 9, "x", 1.0),
            cand_at("b", "b.go", 2, "x", 1.0),
            cand_at("c", "a.go", 50, "x", 1.0),
            cand_at("d", "z.go", 1, "x", 3.0),
        ]);
        assert_eq!(ids(&out), vec!["d", "c", "b", "a"]);
    }

    #[test]
    fn test_sort_is_deterministic_across_input_orders() {
        let make = || {
            vec![
                cand_at("a", "b.go", 9, "x", 1.0),
                cand_at("b", "b.go", 2, "x", 1.0),
                cand_at("c", "a.go", 50, "x", 2.0),
            ]
        };
        let forward = sort_candidates(make());
        let mut reversed = make();
        reversed.reverse();
        let backward = sort_candidates(reversed);
        assert_eq!(ids(&forward), ids(&backward));
    }

    #[test]
    fn test_select_top_evidence_bounds() {
        let cs = || vec![cand("1", "a.go", "x", 1.0), cand("2", "b.go", "x", 1.0)];
        assert!(select_top_evidence(cs(), 0).is_empty());
        assert!(select_top_evidence(cs(), -3).is_empty());
        assert_eq!(select_top_evidence(cs(), 1).len(), 1);
        assert_eq!(select_top_evidence(cs(), 10).len(), 2);
    }
}
