//! Combined linguistic + sentiment analysis endpoint

use axum::{extract::State, routing::post, Json, Router};

use sentia_common::api::types::{AnalysisRequest, TextAnalysisResponse};

use crate::{ApiResult, AppState};

/// POST /analysis
///
/// **Request:** `{"text": "...", "user_id": 42}`
/// **Response:** `{"nlp_analysis": {...}, "sentiment_analysis": {...},
///   "execution_info": {...}}`
///
/// Runs POS tagging, NER, per-token embeddings and sentiment classification
/// on the same input inside one telemetry envelope; persists one combined
/// record.
pub async fn analyze_text(
    State(state): State<AppState>,
    Json(payload): Json<AnalysisRequest>,
) -> ApiResult<Json<TextAnalysisResponse>> {
    let response = state.orchestrator.analyze_text(&payload).await?;
    Ok(Json(response))
}

/// Build analysis routes
pub fn analysis_routes() -> Router<AppState> {
    Router::new().route("/analysis", post(analyze_text))
}
