//! `scry search`: lexical search over the workspace index.

use anyhow::Result;
use serde::Serialize;

use scry_core::ask::snippet::trim_snippet;
use scry_core::search::{search, SearchResult};

use crate::config::Config;
use crate::exit::ExitError;
use crate::sqlite_store::SqliteStore;
use crate::workspace::WorkspacePaths;

const EXCERPT_CHARS: i64 = 100;

#[derive(Serialize)]
struct SearchHitJson<'a> {
    id: &'a str,
    path: &'a str,
    start_line: i64,
    end_line: i64,
    lang: &'a str,
    score: f64,
    excerpt: String,
}

/// First non-blank line of a chunk, shortened for display.
fn excerpt(content: &str) -> String {
    let line = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    trim_snippet(line, EXCERPT_CHARS)
}

pub async fn run_search(
    config: &Config,
    ws: &WorkspacePaths,
    query: &str,
    limit: Option<i64>,
    json: bool,
) -> Result<()> {
    let store = SqliteStore::open_existing(ws).await?;
    let limit = limit.unwrap_or(config.search.limit);
    let results = search(&store, query, limit).await;
    store.close().await;
    let results = results?;

    if json {
        print_json(&results)?;
    } else if results.is_empty() {
        println!("No results.");
    } else {
        print_human(&results);
    }

    if results.is_empty() {
        return Err(ExitError::no_results().into());
    }
    Ok(())
}

fn print_json(results: &[SearchResult]) -> Result<()> {
    let hits: Vec<SearchHitJson> = results
        .iter()
        .map(|r| SearchHitJson {
            id: &r.chunk.id,
            path: &r.chunk.file_path,
            start_line: r.chunk.start_line,
            end_line: r.chunk.end_line,
            lang: &r.chunk.lang,
            score: r.score,
            excerpt: excerpt(&r.chunk.content),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&hits)?);
    Ok(())
}

fn print_human(results: &[SearchResult]) {
    for (i, r) in results.iter().enumerate() {
        println!(
            "{}. [{:.2}] {}:{}-{}",
            i + 1,
            r.score,
            r.chunk.file_path,
            r.chunk.start_line,
            r.chunk.end_line
        );
        println!("    excerpt: \"{}\"", excerpt(&r.chunk.content));
        println!();
    }
}
