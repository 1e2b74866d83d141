//! Language-aware chunker.
//!
//! Splits one file's text into non-overlapping, line-addressed [`Chunk`]s.
//! The strategy is picked from the file extension:
//!
//! - **Go**: one chunk per top-level function, method, or type declaration,
//!   located with tree-sitter. A file that is not valid Go, or that has no
//!   such declarations, becomes a single whole-file chunk (blank files
//!   included).
//! - **Markdown**: a new chunk starts at every heading line; text before
//!   the first heading forms its own chunk.
//! - Anything else yields no chunks.
//!
//! Chunking never fails. Malformed Go degrades to the whole-file fallback,
//! blank Markdown yields zero chunks, and every emitted range is clamped to
//! `[1, line_count]`, where lines are the `\n`-separated segments of the
//! text.
//!
//! # Example
//!
//! ```rust
//! use scry_core::chunk::chunks_for_file;
//!
//! let chunks = chunks_for_file("doc.md", "# Title\nIntro\n## Section\nBody\n");
//! assert_eq!(chunks.len(), 2);
//! assert_eq!((chunks[0].start_line, chunks[0].end_line), (1, 2));
//! assert_eq!(chunks[1].start_line, 3);
//! ```

use tree_sitter::Parser;

use crate::models::{Chunk, Lang};

/// Top-level Go node kinds that become their own chunk.
const GO_DECL_KINDS: &[&str] = &[
    "function_declaration",
    "method_declaration",
    "type_declaration",
];

/// Everything the Go grammar allows at the top level of a source file.
/// Tree-sitter also accepts bare statements there, which `go build` rejects.
const GO_TOP_LEVEL_KINDS: &[&str] = &[
    "package_clause",
    "import_declaration",
    "const_declaration",
    "var_declaration",
    "function_declaration",
    "method_declaration",
    "type_declaration",
    "comment",
];

/// A 1-based, inclusive line range as reported by the parser (unclamped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Result of locating declarations in structured source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanOutcome {
    /// Declaration spans sorted by start line.
    Precise(Vec<Span>),
    /// Parsing failed or found nothing; index the file as one chunk.
    WholeFile,
}

/// Chunk a file according to the language implied by its extension.
pub fn chunks_for_file(path: &str, content: &str) -> Vec<Chunk> {
    match Lang::from_path(path) {
        Some(Lang::Go) => chunk_go(path, content),
        Some(Lang::Markdown) => chunk_markdown(path, content),
        None => Vec::new(),
    }
}

/// Chunk Go source by top-level declarations.
pub fn chunk_go(path: &str, content: &str) -> Vec<Chunk> {
    let lines: Vec<&str> = content.split('\n').collect();
    match go_spans(content) {
        SpanOutcome::Precise(spans) => spans
            .into_iter()
            .map(|span| {
                let start = clamp_line(span.start, lines.len());
                let end = clamp_line(span.end, lines.len()).max(start);
                Chunk {
                    file_path: path.to_string(),
                    start_line: start as i64,
                    end_line: end as i64,
                    text: lines[start - 1..end].join("\n"),
                    lang: Lang::Go,
                }
            })
            .collect(),
        SpanOutcome::WholeFile => vec![Chunk {
            file_path: path.to_string(),
            start_line: 1,
            end_line: lines.len() as i64,
            text: content.to_string(),
            lang: Lang::Go,
        }],
    }
}

/// Locate top-level Go declarations.
pub fn go_spans(content: &str) -> SpanOutcome {
    let mut parser = Parser::new();
    if parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .is_err()
    {
        return SpanOutcome::WholeFile;
    }
    let Some(tree) = parser.parse(content, None) else {
        return SpanOutcome::WholeFile;
    };

    let root = tree.root_node();
    if root.has_error() {
        tracing::debug!("go source has syntax errors, using whole-file chunk");
        return SpanOutcome::WholeFile;
    }

    let mut cursor = root.walk();
    let top_level: Vec<_> = root.named_children(&mut cursor).collect();
    if !is_go_source_file(&top_level) {
        tracing::debug!("go source is not a valid source file, using whole-file chunk");
        return SpanOutcome::WholeFile;
    }

    let mut spans: Vec<Span> = top_level
        .iter()
        .filter(|node| GO_DECL_KINDS.contains(&node.kind()))
        .map(|node| Span {
            start: node.start_position().row + 1,
            end: node.end_position().row + 1,
        })
        .collect();

    if spans.is_empty() {
        return SpanOutcome::WholeFile;
    }
    spans.sort_by_key(|s| s.start);
    SpanOutcome::Precise(spans)
}

/// A package clause first, then only declarations and comments.
fn is_go_source_file(top_level: &[tree_sitter::Node<'_>]) -> bool {
    let first = top_level.iter().find(|n| n.kind() != "comment");
    first.is_some_and(|n| n.kind() == "package_clause")
        && top_level
            .iter()
            .all(|n| GO_TOP_LEVEL_KINDS.contains(&n.kind()))
}

/// Chunk Markdown by heading lines.
pub fn chunk_markdown(path: &str, content: &str) -> Vec<Chunk> {
    let lines: Vec<&str> = content.split('\n').collect();
    let line_count = lines.len();
    let mut chunks = Vec::new();
    let mut start = 1usize;
    let mut current: Vec<&str> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let ln = i + 1;
        if is_heading(line) {
            push_markdown(&mut chunks, path, &current, start, ln - 1, line_count);
            current.clear();
            current.push(line);
            start = ln;
            continue;
        }
        // Leading empty lines never open a chunk.
        if current.iter().all(|l| l.is_empty()) {
            current.clear();
            start = ln;
        }
        current.push(line);
    }
    push_markdown(&mut chunks, path, &current, start, line_count, line_count);

    chunks
}

fn is_heading(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn push_markdown(
    chunks: &mut Vec<Chunk>,
    path: &str,
    current: &[&str],
    start: usize,
    end: usize,
    line_count: usize,
) {
    let text = current.join("\n");
    if text.trim().is_empty() {
        return;
    }
    let start = clamp_line(start, line_count);
    let end = clamp_line(end, line_count).max(start);
    chunks.push(Chunk {
        file_path: path.to_string(),
        start_line: start as i64,
        end_line: end as i64,
        text,
        lang: Lang::Markdown,
    });
}

fn clamp_line(line: usize, max: usize) -> usize {
    line.clamp(1, max.max(1))
}
