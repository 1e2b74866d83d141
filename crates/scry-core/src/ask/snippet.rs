//! Stage 7: short excerpts centred on a question term.
//!
//! Windows are measured in characters so a cut never lands inside a
//! multi-byte character. `...` marks each side that was cut.

const ELLIPSIS: &str = "...";

/// Lowercase `text` one character at a time, remembering for every
/// character of the result which character of `text` produced it.
fn lowered_with_origin(text: &str) -> (String, Vec<usize>) {
    let mut lowered = String::with_capacity(text.len());
    let mut origin = Vec::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        for l in c.to_lowercase() {
            lowered.push(l);
            origin.push(i);
        }
    }
    (lowered, origin)
}

/// Character index in `text` where the first `terms` entry that occurs in
/// it begins. Terms are tried in the caller's order.
fn first_term_position(text: &str, terms: &[String]) -> Option<usize> {
    let (lowered, origin) = lowered_with_origin(text);
    terms
        .iter()
        .filter(|t| !t.is_empty())
        .find_map(|t| lowered.find(t.to_lowercase().as_str()))
        .map(|byte| origin[lowered[..byte].chars().count()])
}

/// Excerpt of at most `max_chars` characters around the first matching
/// term, plus ellipses. Falls back to [`trim_snippet`] when no term
/// occurs. Non-positive `max_chars` yields an empty string.
pub fn snippet_around_term(text: &str, terms: &[String], max_chars: i64) -> String {
    if max_chars <= 0 {
        return String::new();
    }
    let Some(pos) = first_term_position(text, terms) else {
        return trim_snippet(text, max_chars);
    };

    let max = max_chars as usize;
    let chars: Vec<char> = text.chars().collect();
    let start = pos.saturating_sub(max / 3);
    let end = (start + max).min(chars.len());

    let window: String = chars[start..end].iter().collect();
    let mut out = String::new();
    if start > 0 {
        out.push_str(ELLIPSIS);
    }
    out.push_str(window.trim());
    if end < chars.len() {
        out.push_str(ELLIPSIS);
    }
    out
}

/// Whole text trimmed when it fits in `max_chars`, otherwise its first
/// `max_chars` characters trimmed and followed by `...`.
pub fn trim_snippet(text: &str, max_chars: i64) -> String {
    if max_chars <= 0 {
        return String::new();
    }
    let max = max_chars as usize;
    if text.chars().count() <= max {
        return text.trim().to_string();
    }
    let head: String = text.chars().take(max).collect();
    format!("{}{ELLIPSIS}", head.trim())
}
