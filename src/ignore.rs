//! Exclusion rules for the file enumerator.
//!
//! Patterns come from, in order: the built-in defaults, `.gitignore`,
//! `.scryignore`, then `[index].extra_ignore` from the config. A path is
//! excluded when any pattern matches it:
//!
//! - `dir/` (trailing slash): the path starts with `dir/`.
//! - `a/*.go` (contains a slash): shell glob over the whole relative path;
//!   `*` never crosses `/`.
//! - `*.pb.go` (no slash): shell glob over the whole path, then over the
//!   file name alone.
//!
//! Negation (`!pattern`) and anchoring are not supported.

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::path::Path;

pub const DEFAULT_PATTERNS: &[&str] = &["*_test.go", "testdata/"];

pub const PATTERN_FILES: &[&str] = &[".gitignore", ".scryignore"];

#[derive(Debug, Clone)]
enum Rule {
    Prefix(String),
    Glob { matcher: GlobMatcher, basename: bool },
}

impl Rule {
    fn parse(pattern: &str) -> Option<Self> {
        if pattern.ends_with('/') {
            return Some(Self::Prefix(pattern.to_string()));
        }
        let glob = match GlobBuilder::new(pattern).literal_separator(true).build() {
            Ok(g) => g,
            Err(e) => {
                tracing::warn!(pattern, error = %e, "skipping invalid ignore pattern");
                return None;
            }
        };
        Some(Self::Glob {
            matcher: glob.compile_matcher(),
            basename: !pattern.contains('/'),
        })
    }

    fn matches(&self, rel: &str) -> bool {
        match self {
            Self::Prefix(prefix) => rel.starts_with(prefix.as_str()),
            Self::Glob { matcher, basename } => {
                if matcher.is_match(rel) {
                    return true;
                }
                *basename && matcher.is_match(rel.rsplit('/').next().unwrap_or(rel))
            }
        }
    }
}

/// Compiled exclusion rules.
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    rules: Vec<Rule>,
}

impl IgnoreMatcher {
    /// Compile `patterns`, slash-normalizing each; blank entries are skipped.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let rules = patterns
            .iter()
            .map(|p| p.as_ref().trim().replace('\\', "/"))
            .filter(|p| !p.is_empty())
            .filter_map(|p| Rule::parse(&p))
            .collect();
        Self { rules }
    }

    /// Defaults, then the repository's pattern files, then `extra`.
    pub fn load(root: &Path, extra: &[String]) -> Result<Self> {
        let mut patterns: Vec<String> = DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect();
        for name in PATTERN_FILES {
            patterns.extend(read_pattern_file(&root.join(name))?);
        }
        patterns.extend(extra.iter().cloned());
        Ok(Self::new(&patterns))
    }

    /// Whether the repo-relative path is excluded.
    pub fn is_ignored(&self, rel_path: &str) -> bool {
        let rel = rel_path.replace('\\', "/");
        self.rules.iter().any(|r| r.matches(&rel))
    }

    /// Whether the directory at `rel_path` is excluded, either by its own
    /// name or by a `dir/` prefix rule that would exclude everything in it.
    pub fn is_dir_ignored(&self, rel_path: &str) -> bool {
        self.is_ignored(rel_path) || self.is_ignored(&format!("{}/", rel_path.trim_end_matches('/')))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Non-blank, non-comment lines of a pattern file. A missing file yields
/// nothing; any other read failure is an error.
fn read_pattern_file(path: &Path) -> Result<Vec<String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read ignore file: {}", path.display()))
        }
    };
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}
