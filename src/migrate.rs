use anyhow::Result;
use sqlx::SqlitePool;

/// Create the index schema. Safe to run on every open.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS files (
            path TEXT PRIMARY KEY,
            hash TEXT NOT NULL,
            mtime INTEGER NOT NULL,
            size INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Byte-identical files share chunk ids, so the owning path is part of the key.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chunks (
            id TEXT NOT NULL,
            file_path TEXT NOT NULL,
            start_line INTEGER NOT NULL,
            end_line INTEGER NOT NULL,
            lang TEXT NOT NULL,
            content TEXT NOT NULL,
            PRIMARY KEY (file_path, id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS terms (
            term TEXT NOT NULL,
            chunk_id TEXT NOT NULL,
            file_path TEXT NOT NULL,
            tf INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_chunks_id ON chunks(id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_terms_term ON terms(term)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_terms_file_path ON terms(file_path)")
        .execute(pool)
        .await?;

    Ok(())
}
