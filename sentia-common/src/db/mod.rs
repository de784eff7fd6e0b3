//! Database access for Sentia
//!
//! All services share one SQLite database. The API server appends one row
//! per analysis call (telemetry included) and maintains the singleton
//! service_status row; the bot appends user command logs.

pub mod records;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Connects to the shared database file, creating it (and its parent
/// directory) when missing, then ensures all tables exist.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create Sentia tables if they don't exist
///
/// `service_status` holds one row keyed by service_name (upsert target);
/// `sentiment`, `analysis` and `user_log` are append-only.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS service_status (
            service_name TEXT PRIMARY KEY,
            version TEXT NOT NULL,
            log_level TEXT NOT NULL,
            status TEXT NOT NULL,
            models_info TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sentiment (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            text TEXT NOT NULL,
            label TEXT NOT NULL,
            score REAL NOT NULL,
            predicted_at TEXT NOT NULL,
            execution_time REAL NOT NULL,
            model_version TEXT NOT NULL,
            text_length INTEGER NOT NULL,
            memory_usage INTEGER NOT NULL,
            cpu_usage REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS analysis (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            text TEXT NOT NULL,
            pos_summary TEXT NOT NULL,
            pos_counts TEXT NOT NULL,
            ner_summary TEXT NOT NULL,
            ner_counts TEXT NOT NULL,
            sentiment_label TEXT NOT NULL,
            sentiment_score REAL NOT NULL,
            predicted_at TEXT NOT NULL,
            execution_time REAL NOT NULL,
            model_version TEXT NOT NULL,
            text_length INTEGER NOT NULL,
            memory_usage INTEGER NOT NULL,
            cpu_usage REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            username TEXT NOT NULL,
            command_time TEXT NOT NULL,
            command_date TEXT NOT NULL,
            command TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (service_status, sentiment, analysis, user_log)");

    Ok(())
}
