//! Locations of the per-repository metadata directory and index database.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Name of the metadata directory under the repository root.
pub const META_DIR: &str = ".scry";
/// File name of the index database inside [`META_DIR`].
pub const INDEX_DB: &str = "index.db";

#[derive(Debug, Clone)]
pub struct WorkspacePaths {
    pub root: PathBuf,
    pub meta_dir: PathBuf,
    pub db_path: PathBuf,
}

impl WorkspacePaths {
    pub fn resolve(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let meta_dir = root.join(META_DIR);
        let db_path = meta_dir.join(INDEX_DB);
        Self {
            root,
            meta_dir,
            db_path,
        }
    }

    /// Create the metadata directory if needed.
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.meta_dir)
            .with_context(|| format!("Failed to create {}", self.meta_dir.display()))
    }

    pub fn index_exists(&self) -> bool {
        self.db_path.is_file()
    }

    /// Remove the index database and its WAL siblings. Missing files are fine.
    pub fn clean(&self) -> Result<()> {
        for path in self.db_files() {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!(path = %path.display(), "removed"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to remove {}", path.display()))
                }
            }
        }
        Ok(())
    }

    fn db_files(&self) -> [PathBuf; 3] {
        [
            self.db_path.clone(),
            sibling(&self.db_path, "-wal"),
            sibling(&self.db_path, "-shm"),
        ]
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}
