//! Evidence ranking pipeline behind `scry ask`.
//!
//! Turns lexical search candidates plus the question's terms into either a
//! short, ordered list of cited evidence or a typed refusal. The stages run
//! strictly in this order, each one a separate function so it can be
//! tested alone:
//!
//! 1. **Term filter**: drop candidates whose text contains no query term
//!    ([`filter::filter_by_query_terms`]).
//! 2. **Match preference**: keep candidates matching two or more distinct
//!    terms if there are any, otherwise those matching one
//!    ([`filter::apply_match_preference`]).
//! 3. **Topical boost** ([`rules::apply_boosts`]).
//! 4. **Whitelist promotion** ([`rules::apply_whitelist_promotion`]).
//! 5. **Sort** by score desc, path asc, start line asc ([`rank::sort_candidates`]).
//! 6. **Top-N** ([`rank::select_top_evidence`]).
//! 7. **Snippets** ([`snippet::snippet_around_term`]).
//! 8. **Decision**: refuse with [`RefusalReason::NoEvidence`] when nothing
//!    survived, or [`RefusalReason::LowScore`] when the selected evidence's
//!    summed *search* score (before boosts) is under `min_score`.
//!
//! The pipeline never fails: any input, including empty candidate or term
//! lists, maps to a well-defined [`Decision`].

pub mod filter;
pub mod rank;
pub mod rules;
pub mod snippet;

use std::collections::HashSet;

use serde::Serialize;

use crate::models::ChunkView;
use crate::search::SearchResult;

pub use rules::{default_boost_rules, default_whitelist_rules, PathRule};

/// Minimum length, in characters, of a question term.
pub const MIN_QUESTION_TERM_CHARS: usize = 3;

/// A search hit moving through the ranking stages.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub chunk: ChunkView,
    /// Score as produced by lexical search. Never modified by the pipeline.
    pub base_score: f64,
    /// Working score: `base_score` plus any boost and whitelist bonuses.
    pub score: f64,
    /// Distinct question terms found in the chunk text (set by stage 2).
    pub match_count: usize,
}

impl Candidate {
    pub fn new(chunk: ChunkView, score: f64) -> Self {
        Self {
            chunk,
            base_score: score,
            score,
            match_count: 0,
        }
    }
}

impl From<SearchResult> for Candidate {
    fn from(r: SearchResult) -> Self {
        Self::new(r.chunk, r.score)
    }
}

/// A selected candidate with the excerpt shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct Evidence {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub snippet: String,
}

/// Why the pipeline declined to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefusalReason {
    /// No candidate survived filtering and selection.
    NoEvidence,
    /// Evidence was found but its summed search score is under the threshold.
    LowScore,
}

impl RefusalReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoEvidence => "no_evidence",
            Self::LowScore => "low_score",
        }
    }
}

impl std::fmt::Display for RefusalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of the pipeline.
///
/// Exactly one of the two holds: `evidence` is non-empty and `reason` is
/// `None`, or `evidence` is empty and `reason` says why.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub evidence: Vec<Evidence>,
    pub reason: Option<RefusalReason>,
}

impl Decision {
    fn refuse(reason: RefusalReason) -> Self {
        Self {
            evidence: Vec::new(),
            reason: Some(reason),
        }
    }

    pub fn is_refusal(&self) -> bool {
        self.reason.is_some()
    }
}

/// Tuning knobs for [`decide`].
#[derive(Debug, Clone)]
pub struct AskOptions {
    /// Maximum evidence returned. Non-positive selects nothing.
    pub max_evidence: i64,
    /// Snippet window in characters. Non-positive yields empty snippets.
    pub snippet_chars: i64,
    /// Minimum summed search score of the selected evidence.
    pub min_score: f64,
    /// Stage 3 rules.
    pub boost_rules: Vec<PathRule>,
    /// Stage 4 rules.
    pub whitelist_rules: Vec<PathRule>,
}

impl Default for AskOptions {
    fn default() -> Self {
        Self {
            max_evidence: 2,
            snippet_chars: 240,
            min_score: 1.0,
            boost_rules: default_boost_rules(),
            whitelist_rules: default_whitelist_rules(),
        }
    }
}

/// Split a question into lowercase terms of at least three characters,
/// de-duplicated in first-occurrence order.
///
/// ```rust
/// use scry_core::ask::tokenize_question;
///
/// assert_eq!(
///     tokenize_question("Ignore, scan! gitignore; Exclude? ignore"),
///     vec!["ignore", "scan", "gitignore", "exclude"],
/// );
/// ```
pub fn tokenize_question(question: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    question
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_QUESTION_TERM_CHARS)
        .filter(|t| seen.insert(t.to_string()))
        .map(str::to_string)
        .collect()
}

/// Stages 1 to 7: filter, prefer, boost, promote, sort, select, snippet.
pub fn build_evidence(candidates: Vec<Candidate>, terms: &[String], opts: &AskOptions) -> Vec<Evidence> {
    let filtered = filter::filter_by_query_terms(candidates, terms);
    let preferred = filter::apply_match_preference(filtered, terms);
    let boosted = rules::apply_boosts(preferred, terms, &opts.boost_rules);
    let promoted = rules::apply_whitelist_promotion(boosted, terms, &opts.whitelist_rules);
    let sorted = rank::sort_candidates(promoted);
    let selected = rank::select_top_evidence(sorted, opts.max_evidence);

    selected
        .into_iter()
        .map(|candidate| {
            let snippet = snippet::snippet_around_term(&candidate.chunk.content, terms, opts.snippet_chars);
            Evidence { candidate, snippet }
        })
        .collect()
}

/// Run the whole pipeline and decide whether to answer.
pub fn decide(candidates: Vec<Candidate>, terms: &[String], opts: &AskOptions) -> Decision {
    let evidence = build_evidence(candidates, terms, opts);
    if evidence.is_empty() {
        return Decision::refuse(RefusalReason::NoEvidence);
    }

    let total: f64 = evidence.iter().map(|e| e.candidate.base_score).sum();
    if total < opts.min_score {
        tracing::debug!(total, min_score = opts.min_score, "evidence below threshold");
        return Decision::refuse(RefusalReason::LowScore);
    }

    Decision {
        evidence,
        reason: None,
    }
}

/// One-line summary printed above the evidence list.
pub fn answer_header(evidence: &[Evidence]) -> String {
    format!("Found {} relevant evidence chunk(s).", evidence.len())
}


#[cfg(test)]
mod tests {
    use super::test_support::{cand, cand_at, terms};
    use super::*;

    fn opts(max_evidence: i64, snippet_chars: i64, min_score: f64) -> AskOptions {
        AskOptions {
            max_evidence,
            snippet_chars,
            min_score,
            ..AskOptions::default()
        }
    }

    #[test]
    fn test_tokenize_question_drops_short_and_dedupes() {
        assert_eq!(tokenize_question("go a an the"), vec!["the"]);
        assert_eq!(
            tokenize_question("ignore nasıl çalışıyor"),
            vec!["ignore", "nasıl", "çalışıyor"]
        );
        assert!(tokenize_question("").is_empty());
    }

    #[test]
    fn test_decide_no_evidence_on_empty_input() {
        let dec = decide(Vec::new(), &terms(&["ignore"]), &opts(2, 80, 1.0));
        assert_eq!(dec.reason, Some(RefusalReason::NoEvidence));
        assert!(dec.evidence.is_empty());

        let dec = decide(
            vec![cand("1", "a.go", "ignore", 5.0)],
            &[],
            &opts(2, 80, 1.0),
        );
        assert_eq!(dec.reason, Some(RefusalReason::NoEvidence));
    }

    #[test]
    fn test_decide_no_evidence_when_nothing_matches() {
        let dec = decide(
            vec![cand("1", "a.go", "unrelated", 9.0)],
            &terms(&["ignore"]),
            &opts(2, 80, 1.0),
        );
        assert_eq!(dec.reason, Some(RefusalReason::NoEvidence));
    }

    #[test]
    fn test_decide_low_score_discards_evidence() {
        let dec = decide(
            vec![cand("1", "pkg/ignore/x.go", "ignore patterns", 0.2)],
            &terms(&["ignore"]),
            &opts(2, 80, 5.0),
        );
        assert_eq!(dec.reason, Some(RefusalReason::LowScore));
        assert!(dec.evidence.is_empty());
    }

    #[test]
    fn test_decide_threshold_uses_search_score_not_boosted() {
        // Boost + whitelist add 3.5, which would clear 1.0; the search score does not.
        let dec = decide(
            vec![cand("1", "pkg/ignore/x.go", "ignore patterns", 0.5)],
            &terms(&["ignore"]),
            &opts(2, 80, 1.0),
        );
        assert_eq!(dec.reason, Some(RefusalReason::LowScore));
    }

    #[test]
    fn test_decide_answers_when_threshold_cleared() {
        let dec = decide(
            vec![
                cand("1", "pkg/ignore/x.go", "ignore patterns", 0.6),
                cand("2", "docs/x.md", "ignore everything", 0.6),
            ],
            &terms(&["ignore"]),
            &opts(2, 80, 1.0),
        );
        assert_eq!(dec.reason, None);
        assert!(!dec.is_refusal());
        assert_eq!(dec.evidence.len(), 2);
        assert_eq!(dec.evidence[0].candidate.chunk.file_path, "pkg/ignore/x.go");
        assert!(dec.evidence[0].candidate.score > dec.evidence[0].candidate.base_score);
        assert_eq!(dec.evidence[0].snippet, "ignore patterns");
    }

    #[test]
    fn test_build_evidence_selects_at_most_max() {
        let evidence = build_evidence(
            vec![
                cand("1", "pkg/ignore/x.go", "ignore patterns", 2.0),
                cand("2", "pkg/scan/x.go", "scan rules", 1.0),
                cand("3", "README.md", "other", 3.0),
            ],
            &terms(&["ignore", "scan"]),
            &opts(2, 40, 0.0),
        );
        assert_eq!(evidence.len(), 2);
        assert!(evidence.iter().all(|e| e.candidate.chunk.id != "3"));
    }

    #[test]
    fn test_ranking_prefers_topical_paths() {
        let candidates = vec![
            cand_at("1", "README.md", 1, "scan rules overview", 2.0),
            cand_at("2", "cmd/scry/ask.go", 1, "ask command scan rules", 2.5),
            cand_at("3", "internal/query/ask/boost.go", 1, "apply boosts for scan", 2.2),
            cand_at("4", "pkg/scan/scan.go", 10, "scan rules are defined here", 1.8),
            cand_at("5", "pkg/ignore/ignore.go", 5, "ignore patterns and scan", 1.7),
        ];
        let terms = tokenize_question("ignore nasıl çalışıyor");
        let dec = decide(candidates, &terms, &opts(2, 80, 0.1));
        assert!(!dec.evidence.is_empty());
        let top = &dec.evidence[0].candidate.chunk.file_path;
        assert!(top == "pkg/ignore/ignore.go" || top == "pkg/scan/scan.go", "top was {top}");
    }

    #[test]
    fn test_strong_matches_outrank_higher_scored_weak_ones() {
        let dec = decide(
            vec![
                cand("1", "a.go", "scan only", 50.0),
                cand("2", "b.go", "scan and ignore", 1.0),
            ],
            &terms(&["scan", "ignore"]),
            &AskOptions {
                boost_rules: Vec::new(),
                whitelist_rules: Vec::new(),
                ..opts(2, 80, 0.5)
            },
        );
        assert_eq!(dec.evidence.len(), 1);
        assert_eq!(dec.evidence[0].candidate.chunk.id, "2");
        assert_eq!(dec.evidence[0].candidate.match_count, 2);
    }

    #[test]
    fn test_answer_header() {
        assert_eq!(answer_header(&[]), "Found 0 relevant evidence chunk(s).");
    }

    #[test]
    fn test_refusal_reason_strings() {
        assert_eq!(RefusalReason::NoEvidence.to_string(), "no_evidence");
        assert_eq!(RefusalReason::LowScore.as_str(), "low_score");
    }
}
