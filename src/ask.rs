//! `scry ask`: answer a question with cited evidence, or decline.

use anyhow::Result;

use scry_core::ask::{answer_header, decide, tokenize_question, Candidate, Decision};
use scry_core::search::search;
use scry_core::store::Store;

use crate::config::Config;
use crate::exit::ExitError;
use crate::sqlite_store::SqliteStore;
use crate::workspace::WorkspacePaths;

/// Search for candidates and run them through the ranking pipeline.
pub async fn answer<S: Store + ?Sized>(store: &S, config: &Config, question: &str) -> Result<Decision> {
    let terms = tokenize_question(question);
    let results = search(store, question, config.ask.candidate_limit).await?;
    tracing::debug!(terms = terms.len(), candidates = results.len(), "ask");

    let candidates: Vec<Candidate> = results.into_iter().map(Candidate::from).collect();
    Ok(decide(candidates, &terms, &config.ask.options()))
}

pub async fn run_ask(config: &Config, ws: &WorkspacePaths, question: &str, json: bool) -> Result<()> {
    let store = SqliteStore::open_existing(ws).await?;
    let decision = answer(&store, config, question).await;
    store.close().await;
    let decision = decision?;

    if json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        print_human(&decision);
    }

    if decision.is_refusal() {
        return Err(ExitError::no_results().into());
    }
    Ok(())
}

fn print_human(decision: &Decision) {
    if let Some(reason) = decision.reason {
        println!("I don't know (reason: {})", reason);
        return;
    }

    println!("{}", answer_header(&decision.evidence));
    println!();
    for (i, e) in decision.evidence.iter().enumerate() {
        let c = &e.candidate;
        println!(
            "{}. [{:.2}] {}:{}-{}",
            i + 1,
            c.score,
            c.chunk.file_path,
            c.chunk.start_line,
            c.chunk.end_line
        );
        for line in e.snippet.lines() {
            println!("    {}", line);
        }
        println!();
    }
}
