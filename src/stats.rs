//! `scry status`: index location, size, and record counts.

use anyhow::Result;
use serde::Serialize;

use scry_core::store::Store;

use crate::sqlite_store::SqliteStore;
use crate::workspace::WorkspacePaths;

#[derive(Serialize)]
struct StatusJson {
    root: String,
    index: String,
    size_bytes: u64,
    updated_at: Option<i64>,
    files: i64,
    chunks: i64,
    terms: i64,
}

pub async fn run_status(ws: &WorkspacePaths, json: bool) -> Result<()> {
    let store = SqliteStore::open_existing(ws).await?;
    let stats = store.stats().await;
    store.close().await;
    let stats = stats?;

    let meta = std::fs::metadata(&ws.db_path).ok();
    let size = meta.as_ref().map(|m| m.len()).unwrap_or(0);
    let updated_at = meta
        .and_then(|m| m.modified().ok())
        .map(|t| chrono::DateTime::<chrono::Utc>::from(t).timestamp());

    if json {
        let out = StatusJson {
            root: ws.root.display().to_string(),
            index: ws.db_path.display().to_string(),
            size_bytes: size,
            updated_at,
            files: stats.files,
            chunks: stats.chunks,
            terms: stats.terms,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("scry status");
    println!("===========");
    println!();
    println!("  Root:      {}", ws.root.display());
    println!("  Index:     {}", ws.db_path.display());
    println!("  Size:      {}", format_bytes(size));
    println!(
        "  Updated:   {}",
        updated_at.map(format_ts_relative).unwrap_or_else(|| "unknown".to_string())
    );
    println!();
    println!("  Files:     {}", stats.files);
    println!("  Chunks:    {}", stats.chunks);
    println!("  Postings:  {}", stats.terms);
    println!();
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Unix timestamp as "3 hours ago", or a date once it is over a month old.
fn format_ts_relative(ts: i64) -> String {
    let delta = chrono::Utc::now().timestamp() - ts;
    if delta < 0 {
        return format_ts_iso(ts);
    }
    let plural = |n: i64| if n == 1 { "" } else { "s" };
    match delta {
        d if d < 60 => "just now".to_string(),
        d if d < 3600 => format!("{} min{} ago", d / 60, plural(d / 60)),
        d if d < 86400 => format!("{} hour{} ago", d / 3600, plural(d / 3600)),
        d if d < 86400 * 30 => format!("{} day{} ago", d / 86400, plural(d / 86400)),
        _ => format_ts_iso(ts),
    }
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_are_human_readable() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn relative_times() {
        let now = chrono::Utc::now().timestamp();
        assert_eq!(format_ts_relative(now), "just now");
        assert_eq!(format_ts_relative(now - 120), "2 mins ago");
        assert_eq!(format_ts_relative(now - 3600), "1 hour ago");
        assert_eq!(format_ts_relative(0), "1970-01-01 00:00");
    }
}
