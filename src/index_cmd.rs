//! `scry index`: create or update the workspace index.

use anyhow::Result;

use crate::config::Config;
use crate::indexer::{run_index, IndexOptions};
use crate::progress::ProgressMode;
use crate::sqlite_store::SqliteStore;
use crate::workspace::WorkspacePaths;

pub async fn run_index_command(
    config: &Config,
    ws: &WorkspacePaths,
    clean: bool,
    no_embeddings: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    if no_embeddings {
        tracing::debug!("--no-embeddings: lexical index only");
    }

    ws.ensure()?;
    if clean {
        ws.clean()?;
    }

    let store = SqliteStore::open(&ws.db_path).await?;
    let opts = IndexOptions {
        root: ws.root.clone(),
        extra_ignore: config.index.extra_ignore.clone(),
    };
    let reporter = ProgressMode::from_flags(json, quiet).reporter();
    let summary = run_index(&store, &opts, reporter.as_ref()).await;
    store.close().await;
    let summary = summary?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "indexed {} file(s), {} chunk(s)",
            summary.files_indexed, summary.chunks_indexed
        );
        if summary.files_unchanged > 0 || summary.files_deleted > 0 {
            println!(
                "  unchanged: {}  removed: {}",
                summary.files_unchanged, summary.files_deleted
            );
        }
    }
    Ok(())
}
