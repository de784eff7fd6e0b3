//! Shared API request/response types
//!
//! Wire types used by both sides of the HTTP surface: the API server
//! (sentia-api) serializes them, the companion bot (sentia-bot)
//! deserializes them. Field names are part of the external contract and
//! must not change without a version bump.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ========================================
// Request Types
// ========================================

/// POST /sentiment request body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SentimentRequest {
    /// Text to classify
    pub text: String,
    /// Optional requester id linking the record to a bot user log entry
    #[serde(default)]
    pub log_id: Option<i64>,
}

/// POST /analysis request body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisRequest {
    /// Text to analyze
    pub text: String,
    /// Requesting user id
    pub user_id: i64,
}

/// POST /personalized_response request body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PersonalizedRequest {
    /// Text whose mood drives the generated reply
    pub text: String,
    /// Requester id (kept for parity with the other endpoints)
    pub log_id: i64,
}

// ========================================
// Response Types
// ========================================

/// Model identifiers reported by GET /status
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelsInfo {
    pub sentiment_model: String,
    pub nlp_model: String,
    pub gpt_model: String,
}

/// GET /status response body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatusResponse {
    pub service_name: String,
    pub version: String,
    pub log_level: String,
    pub status: String,
    pub models_info: ModelsInfo,
}

/// Per-call execution telemetry attached to every analysis response
///
/// Produced only for successful analysis calls; persisted once alongside
/// the prediction it describes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecutionInfo {
    /// Wall-clock duration of the model call(s), seconds
    pub execution_time: f64,
    /// RFC 3339 timestamp taken when the call completed
    pub prediction_datetime: String,
    /// Character count of the input text
    pub text_length: u64,
    /// Identifier of the model(s) that produced the prediction
    pub model_version: String,
    /// Process resident set size, bytes
    pub memory_usage: u64,
    /// Process CPU utilization percentage over the sampling interval
    pub cpu_usage: f32,
}

/// Sentiment label with normalized polarity score
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SentimentPrediction {
    /// Model label ("1".."5")
    pub label: String,
    /// Polarity in [-1, 1] (raw model confidence mapped from [0, 1])
    pub score: f64,
}

/// POST /sentiment response body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SentimentAnalysisResponse {
    pub prediction: SentimentPrediction,
    pub execution_info: ExecutionInfo,
}

/// Linguistic analysis section of POST /analysis
///
/// Summaries group token/entity surfaces by exact tag string; for every
/// tag, the count equals the length of the corresponding summary entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NlpAnalysis {
    pub pos_tags_summary: BTreeMap<String, Vec<String>>,
    pub pos_tags_count: BTreeMap<String, usize>,
    pub ner_summary: BTreeMap<String, Vec<String>>,
    pub ner_count: BTreeMap<String, usize>,
    /// One embedding vector per token, parallel to the tokenized input
    pub embeddings: Vec<Vec<f32>>,
}

/// POST /analysis response body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextAnalysisResponse {
    pub nlp_analysis: NlpAnalysis,
    pub sentiment_analysis: SentimentPrediction,
    pub execution_info: ExecutionInfo,
}

/// POST /personalized_response response body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PersonalizedResponse {
    pub message: String,
}
