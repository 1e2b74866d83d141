//! SQLite-backed [`Store`].
//!
//! Each mutating call runs in one transaction that touches terms, then
//! chunks, then the file row, so readers see a file either fully replaced
//! (or deleted) or not at all.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::path::Path;

use scry_core::models::{ChunkRecord, ChunkView, FileRecord, StoreStats, TermHit, TermRecord};
use scry_core::store::Store;

use crate::exit::ExitError;
use crate::workspace::WorkspacePaths;
use crate::{db, migrate};

/// SQLite bind-parameter batch size for `IN (...)` lookups.
const ID_BATCH: usize = 500;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open the database at `db_path`, creating it and its schema if needed.
    pub async fn open(db_path: &Path) -> Result<Self> {
        let pool = db::connect(db_path).await?;
        migrate::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Open the workspace's index for reading; fails with an index-missing
    /// exit code if `scry index` has never run.
    pub async fn open_existing(ws: &WorkspacePaths) -> Result<Self> {
        if !ws.index_exists() {
            return Err(ExitError::index_missing(&ws.db_path).into());
        }
        Self::open(&ws.db_path).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn row_to_view(row: &SqliteRow) -> ChunkView {
    ChunkView {
        id: row.get("id"),
        file_path: row.get("file_path"),
        start_line: row.get("start_line"),
        end_line: row.get("end_line"),
        lang: row.get("lang"),
        content: row.get("content"),
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn get_file(&self, path: &str) -> Result<Option<FileRecord>> {
        let row = sqlx::query("SELECT path, hash, mtime, size FROM files WHERE path = ?")
            .bind(path)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| FileRecord {
            path: r.get("path"),
            hash: r.get("hash"),
            mtime: r.get("mtime"),
            size: r.get("size"),
        }))
    }

    async fn list_files(&self) -> Result<Vec<String>> {
        let paths: Vec<String> = sqlx::query_scalar("SELECT path FROM files ORDER BY path")
            .fetch_all(&self.pool)
            .await?;
        Ok(paths)
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM terms WHERE file_path = ?")
            .bind(path)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM chunks WHERE file_path = ?")
            .bind(path)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM files WHERE path = ?")
            .bind(path)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn replace_file_data(
        &self,
        file: &FileRecord,
        chunks: &[ChunkRecord],
        terms: &[TermRecord],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM terms WHERE file_path = ?")
            .bind(&file.path)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM chunks WHERE file_path = ?")
            .bind(&file.path)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO files (path, hash, mtime, size)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(path) DO UPDATE SET
                hash = excluded.hash,
                mtime = excluded.mtime,
                size = excluded.size
            "#,
        )
        .bind(&file.path)
        .bind(&file.hash)
        .bind(file.mtime)
        .bind(file.size)
        .execute(&mut *tx)
        .await?;

        for c in chunks {
            // A repeated (path, id) pair is the same text at the same lines.
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO chunks (id, file_path, start_line, end_line, lang, content)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&c.id)
            .bind(&file.path)
            .bind(c.start_line)
            .bind(c.end_line)
            .bind(&c.lang)
            .bind(&c.content)
            .execute(&mut *tx)
            .await?;
        }

        for t in terms {
            sqlx::query("INSERT INTO terms (term, chunk_id, file_path, tf) VALUES (?, ?, ?, ?)")
                .bind(&t.term)
                .bind(&t.chunk_id)
                .bind(&file.path)
                .bind(t.tf)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get_chunk(&self, id: &str) -> Result<Option<ChunkView>> {
        let row = sqlx::query(
            r#"
            SELECT id, file_path, start_line, end_line, lang, content
            FROM chunks WHERE id = ?
            ORDER BY file_path
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(row_to_view))
    }

    async fn get_chunks_by_ids(&self, ids: &[String]) -> Result<Vec<ChunkView>> {
        let mut out = Vec::with_capacity(ids.len());
        for batch in ids.chunks(ID_BATCH) {
            let placeholders = vec!["?"; batch.len()].join(", ");
            let sql = format!(
                "SELECT id, file_path, start_line, end_line, lang, content \
                 FROM chunks WHERE id IN ({})",
                placeholders
            );
            let mut query = sqlx::query(&sql);
            for id in batch {
                query = query.bind(id);
            }
            let rows = query.fetch_all(&self.pool).await?;
            out.extend(rows.iter().map(row_to_view));
        }
        Ok(out)
    }

    async fn term_hits(&self, term: &str) -> Result<Vec<TermHit>> {
        let rows = sqlx::query(
            r#"
            SELECT chunk_id, MAX(tf) AS tf
            FROM terms WHERE term = ?
            GROUP BY chunk_id
            ORDER BY chunk_id
            "#,
        )
        .bind(term)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| TermHit {
                chunk_id: r.get("chunk_id"),
                tf: r.get("tf"),
            })
            .collect())
    }

    async fn stats(&self) -> Result<StoreStats> {
        let files: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(&self.pool)
            .await?;
        let chunks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunks")
            .fetch_one(&self.pool)
            .await?;
        let terms: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM terms")
            .fetch_one(&self.pool)
            .await?;
        Ok(StoreStats {
            files,
            chunks,
            terms,
        })
    }
}
