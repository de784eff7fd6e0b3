//! Typed persistence records and gateway queries
//!
//! One record struct per table, validated/serialized before the query runs.
//! Structured fields (models_info, POS/NER summaries) are stored as JSON
//! TEXT columns so they stay queryable with SQLite's json functions.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::collections::{BTreeMap, HashSet};

use crate::api::types::ModelsInfo;
use crate::{Error, Result};

/// Singleton service status row, upsert-keyed by service_name
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceStatusRecord {
    pub service_name: String,
    pub version: String,
    pub log_level: String,
    pub status: String,
    pub models_info: ModelsInfo,
}

/// Append-only sentiment analysis row (prediction + telemetry)
#[derive(Debug, Clone)]
pub struct SentimentRecord {
    pub user_id: Option<i64>,
    pub text: String,
    pub label: String,
    /// Normalized polarity in [-1, 1]
    pub score: f64,
    pub predicted_at: String,
    pub execution_time: f64,
    pub model_version: String,
    pub text_length: i64,
    pub memory_usage: i64,
    pub cpu_usage: f64,
}

/// Append-only combined analysis row (POS/NER summaries + sentiment + telemetry)
#[derive(Debug, Clone)]
pub struct AnalysisRecord {
    pub user_id: Option<i64>,
    pub text: String,
    pub pos_summary: BTreeMap<String, Vec<String>>,
    pub pos_counts: BTreeMap<String, usize>,
    pub ner_summary: BTreeMap<String, Vec<String>>,
    pub ner_counts: BTreeMap<String, usize>,
    pub sentiment_label: String,
    pub sentiment_score: f64,
    pub predicted_at: String,
    pub execution_time: f64,
    pub model_version: String,
    pub text_length: i64,
    pub memory_usage: i64,
    pub cpu_usage: f64,
}

/// Bot-side command log row; the date column is derived from command_time
#[derive(Debug, Clone)]
pub struct UserLogRecord {
    pub user_id: i64,
    pub username: String,
    pub command_time: DateTime<Utc>,
    pub command: String,
}

/// Insert-or-update the service status row
///
/// Idempotent by service_name, so a concurrent first-access race between
/// two /status calls is benign: both writes land on the same row.
pub async fn upsert_status(pool: &SqlitePool, record: &ServiceStatusRecord) -> Result<()> {
    let models_info = serde_json::to_string(&record.models_info)
        .map_err(|e| Error::Internal(format!("Failed to serialize models_info: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO service_status (service_name, version, log_level, status, models_info)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(service_name) DO UPDATE SET
            version = excluded.version,
            log_level = excluded.log_level,
            status = excluded.status,
            models_info = excluded.models_info
        "#,
    )
    .bind(&record.service_name)
    .bind(&record.version)
    .bind(&record.log_level)
    .bind(&record.status)
    .bind(&models_info)
    .execute(pool)
    .await?;

    Ok(())
}

/// Read the service status row, if it has been created yet
pub async fn get_status(pool: &SqlitePool) -> Result<Option<ServiceStatusRecord>> {
    let row = sqlx::query(
        "SELECT service_name, version, log_level, status, models_info FROM service_status LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let models_info: String = row.get("models_info");
            let models_info: ModelsInfo = serde_json::from_str(&models_info).map_err(|e| {
                Error::Internal(format!("Failed to deserialize models_info: {}", e))
            })?;

            Ok(Some(ServiceStatusRecord {
                service_name: row.get("service_name"),
                version: row.get("version"),
                log_level: row.get("log_level"),
                status: row.get("status"),
                models_info,
            }))
        }
        None => Ok(None),
    }
}

/// Append one sentiment analysis record
pub async fn insert_sentiment(pool: &SqlitePool, record: &SentimentRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO sentiment (
            user_id, text, label, score, predicted_at,
            execution_time, model_version, text_length, memory_usage, cpu_usage
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.user_id)
    .bind(&record.text)
    .bind(&record.label)
    .bind(record.score)
    .bind(&record.predicted_at)
    .bind(record.execution_time)
    .bind(&record.model_version)
    .bind(record.text_length)
    .bind(record.memory_usage)
    .bind(record.cpu_usage)
    .execute(pool)
    .await?;

    Ok(())
}

/// Append one combined analysis record
pub async fn insert_analysis(pool: &SqlitePool, record: &AnalysisRecord) -> Result<()> {
    // Serialize structured fields BEFORE touching the connection
    let pos_summary = to_json(&record.pos_summary, "pos_summary")?;
    let pos_counts = to_json(&record.pos_counts, "pos_counts")?;
    let ner_summary = to_json(&record.ner_summary, "ner_summary")?;
    let ner_counts = to_json(&record.ner_counts, "ner_counts")?;

    sqlx::query(
        r#"
        INSERT INTO analysis (
            user_id, text, pos_summary, pos_counts, ner_summary, ner_counts,
            sentiment_label, sentiment_score, predicted_at,
            execution_time, model_version, text_length, memory_usage, cpu_usage
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.user_id)
    .bind(&record.text)
    .bind(&pos_summary)
    .bind(&pos_counts)
    .bind(&ner_summary)
    .bind(&ner_counts)
    .bind(&record.sentiment_label)
    .bind(record.sentiment_score)
    .bind(&record.predicted_at)
    .bind(record.execution_time)
    .bind(&record.model_version)
    .bind(record.text_length)
    .bind(record.memory_usage)
    .bind(record.cpu_usage)
    .execute(pool)
    .await?;

    Ok(())
}

/// Append one user command log record
pub async fn insert_user_log(pool: &SqlitePool, record: &UserLogRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_log (user_id, username, command_time, command_date, command)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.user_id)
    .bind(&record.username)
    .bind(record.command_time.to_rfc3339())
    .bind(record.command_time.date_naive().to_string())
    .bind(&record.command)
    .execute(pool)
    .await?;

    Ok(())
}

/// Distinct user ids that have ever issued a bot command
pub async fn get_distinct_user_ids(pool: &SqlitePool) -> Result<HashSet<i64>> {
    let rows: Vec<i64> = sqlx::query_scalar("SELECT DISTINCT user_id FROM user_log")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().collect())
}

fn to_json<T: serde::Serialize>(value: &T, field: &str) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| Error::Internal(format!("Failed to serialize {}: {}", field, e)))
}
