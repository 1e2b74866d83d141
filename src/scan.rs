//! File enumerator.
//!
//! Walks the repository root and yields every regular file that survives
//! the [`IgnoreMatcher`], as a repo-relative, slash-normalized path with
//! its modification time and size. `.git/` and `.scry/` are never entered,
//! and an ignored directory is pruned without descending into it.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::ignore::IgnoreMatcher;
use crate::workspace::META_DIR;

const ALWAYS_SKIPPED: &[&str] = &[".git", META_DIR];

/// One enumerated file.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Absolute (or root-joined) path for reading.
    pub abs_path: PathBuf,
    /// Repo-relative, `/`-separated.
    pub rel_path: String,
    /// Unix seconds.
    pub mtime: i64,
    pub size: i64,
}

fn relative(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn always_skipped(rel: &str) -> bool {
    ALWAYS_SKIPPED
        .iter()
        .any(|d| rel == *d || rel.starts_with(&format!("{d}/")))
}

/// Enumerate the files under `root`, in walk order.
pub fn list_files(root: &Path, matcher: &IgnoreMatcher) -> Result<Vec<ScannedFile>> {
    if !root.is_dir() {
        bail!("Repository root is not a directory: {}", root.display());
    }

    let keep = |entry: &DirEntry| {
        if entry.depth() == 0 {
            return true;
        }
        let rel = relative(root, entry.path());
        if always_skipped(&rel) {
            return false;
        }
        if entry.file_type().is_dir() {
            !matcher.is_dir_ignored(&rel)
        } else {
            !matcher.is_ignored(&rel)
        }
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_entry(keep) {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let meta = entry
            .metadata()
            .with_context(|| format!("Failed to stat {}", entry.path().display()))?;
        let mtime = meta
            .modified()
            .map(|t| DateTime::<Utc>::from(t).timestamp())
            .unwrap_or(0);

        files.push(ScannedFile {
            abs_path: entry.path().to_path_buf(),
            rel_path: relative(root, entry.path()),
            mtime,
            size: meta.len() as i64,
        });
    }

    tracing::debug!(root = %root.display(), files = files.len(), "enumerated files");
    Ok(files)
}
