//! Sentiment analysis endpoint

use axum::{extract::State, routing::post, Json, Router};

use sentia_common::api::types::{SentimentAnalysisResponse, SentimentRequest};

use crate::{ApiResult, AppState};

/// POST /sentiment
///
/// **Request:** `{"text": "...", "log_id": 42}` (log_id optional)
/// **Response:** `{"prediction": {"label", "score"}, "execution_info": {...}}`
///
/// The score is the normalized polarity in [-1, 1]. The record (prediction
/// plus telemetry) is persisted before the response is sent.
pub async fn analyze_sentiment(
    State(state): State<AppState>,
    Json(payload): Json<SentimentRequest>,
) -> ApiResult<Json<SentimentAnalysisResponse>> {
    let response = state.orchestrator.analyze_sentiment(&payload).await?;
    Ok(Json(response))
}

/// Build sentiment routes
pub fn sentiment_routes() -> Router<AppState> {
    Router::new().route("/sentiment", post(analyze_sentiment))
}
