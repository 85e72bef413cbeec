//! Database initialization
//!
//! Opens (creating on first run) the SQLite file behind the vote service and
//! makes sure the schema exists. Safe to call on every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// SQLite busy timeout applied to every connection
const BUSY_TIMEOUT_MS: u32 = 5000;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL lets leaderboard reads proceed while votes are being written
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    let pragma_sql = format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS);
    sqlx::query(&pragma_sql).execute(&pool).await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create every arena table (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_vote_records_table(pool).await?;
    create_tally_counters_table(pool).await?;
    Ok(())
}

/// One row per (subject, canonical pair, voter); outcome is in canonical order
async fn create_vote_records_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS vote_records (
            subject TEXT NOT NULL,
            pair_key TEXT NOT NULL,
            voter_id TEXT NOT NULL,
            outcome TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            expires_at INTEGER NOT NULL,
            PRIMARY KEY (subject, pair_key, voter_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_vote_records_expires_at ON vote_records(expires_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// One row per (board, model, metric); all models share the same board key
async fn create_tally_counters_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tally_counters (
            board TEXT NOT NULL,
            model TEXT NOT NULL,
            metric TEXT NOT NULL,
            value INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (board, model, metric)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
