//! Stages 3 and 4: path rules that add score to candidates living under
//! topical directories when the question mentions a trigger term.
//!
//! Boost and whitelist rules share one shape and one application
//! function; they are kept as separate stages so either set can be
//! configured or disabled on its own.

use serde::{Deserialize, Serialize};

use super::Candidate;

/// Adds `bonus` to every candidate whose path starts with one of `paths`,
/// provided the question contains at least one of `terms`.
///
/// A rule adds its bonus at most once per candidate, even when several of
/// its paths or terms match. Bonuses from different rules accumulate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRule {
    pub terms: Vec<String>,
    pub paths: Vec<String>,
    pub bonus: f64,
}

impl PathRule {
    pub fn new(terms: &[&str], paths: &[&str], bonus: f64) -> Self {
        Self {
            terms: terms.iter().map(|t| t.to_string()).collect(),
            paths: paths.iter().map(|p| p.to_string()).collect(),
            bonus,
        }
    }

    fn triggered_by(&self, query_terms: &[String]) -> bool {
        self.terms
            .iter()
            .any(|t| query_terms.iter().any(|q| q.eq_ignore_ascii_case(t)))
    }

    fn covers(&self, path: &str) -> bool {
        self.paths.iter().any(|p| path.starts_with(p.as_str()))
    }
}

/// Built-in topical boost.
pub fn default_boost_rules() -> Vec<PathRule> {
    vec![PathRule::new(
        &["ignore", "scan", "gitignore", "pattern", "exclude"],
        &["pkg/ignore/", "pkg/scan/"],
        2.0,
    )]
}

/// Built-in whitelist promotion.
pub fn default_whitelist_rules() -> Vec<PathRule> {
    vec![PathRule::new(
        &["scan", "ignore", "gitignore", "exclude", "pattern"],
        &["pkg/scan/", "pkg/ignore/"],
        1.5,
    )]
}

fn apply_rules(mut candidates: Vec<Candidate>, terms: &[String], rules: &[PathRule]) -> Vec<Candidate> {
    for rule in rules.iter().filter(|r| r.triggered_by(terms)) {
        for c in candidates.iter_mut().filter(|c| rule.covers(&c.chunk.file_path)) {
            c.score += rule.bonus;
        }
    }
    candidates
}

/// Stage 3.
pub fn apply_boosts(candidates: Vec<Candidate>, terms: &[String], rules: &[PathRule]) -> Vec<Candidate> {
    apply_rules(candidates, terms, rules)
}

/// Stage 4.
pub fn apply_whitelist_promotion(
    candidates: Vec<Candidate>,
    terms: &[String],
    rules: &[PathRule],
) -> Vec<Candidate> {
    apply_rules(candidates, terms, rules)
}
