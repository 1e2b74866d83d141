//! # scry CLI
//!
//! ## Usage
//!
//! ```bash
//! scry [--root <dir>] [--config <file>] [--json] [--quiet] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scry index` | Create or update the index under `.scry/` |
//! | `scry search "<query>"` | Lexical search over indexed chunks |
//! | `scry ask "<question>"` | Cited evidence, or "I don't know" |
//! | `scry status` | Index location and record counts |
//!
//! ## Exit codes
//!
//! `0` success, `1` runtime error, `2` usage error, `3` index missing,
//! `5` no results (empty search or a declined question).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use scry::config;
use scry::exit::{ExitError, EXIT_RUNTIME};
use scry::workspace::WorkspacePaths;
use scry::{ask, index_cmd, search, stats};

/// scry: a local-first codebase memory engine.
#[derive(Parser)]
#[command(
    name = "scry",
    about = "Local-first codebase memory engine",
    version,
    arg_required_else_help = true,
    long_about = "scry incrementally indexes Go and Markdown sources into content-addressed \
    chunks, runs lexical search over them, and answers questions with cited evidence or an \
    explicit refusal."
)]
struct Cli {
    /// Config file (TOML). Must exist when given; otherwise `<root>/.scry.toml`
    /// is used if present.
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Repository root.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Output JSON on stdout (and JSON progress on stderr).
    #[arg(long, global = true)]
    json: bool,

    /// Suppress progress output.
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update local indexes.
    ///
    /// Only files whose content changed since the last run are re-chunked;
    /// files that disappeared are removed from the index.
    Index {
        /// Delete the existing index before indexing.
        #[arg(long)]
        clean: bool,

        /// Skip embeddings (lexical index only).
        #[arg(long)]
        no_embeddings: bool,
    },

    /// Lexical search across the index.
    Search {
        query: String,

        /// Maximum number of results (overrides `[search].limit`).
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Answer a question with citations, or decline.
    Ask { question: String },

    /// Show repo index health.
    Status,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = config::resolve_config(cli.config.as_deref(), &cli.root)?;
    let ws = WorkspacePaths::resolve(&cli.root);

    match cli.command {
        Commands::Index {
            clean,
            no_embeddings,
        } => {
            index_cmd::run_index_command(&cfg, &ws, clean, no_embeddings, cli.json, cli.quiet).await
        }
        Commands::Search { query, limit } => {
            search::run_search(&cfg, &ws, &query, limit, cli.json).await
        }
        Commands::Ask { question } => ask::run_ask(&cfg, &ws, &question, cli.json).await,
        Commands::Status => stats::run_status(&ws, cli.json).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ExitError>() {
            Some(exit) => {
                if !exit.silent {
                    eprintln!("scry: {}", exit);
                }
                ExitCode::from(exit.code)
            }
            None => {
                eprintln!("scry: {:#}", err);
                ExitCode::from(EXIT_RUNTIME)
            }
        },
    }
}
