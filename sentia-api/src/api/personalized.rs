//! Personalized empathetic reply endpoint

use axum::{extract::State, routing::post, Json, Router};

use sentia_common::api::types::{PersonalizedRequest, PersonalizedResponse};

use crate::{ApiResult, AppState};

/// POST /personalized_response
///
/// **Request:** `{"text": "...", "log_id": 42}`
/// **Response:** `{"message": "..."}`
///
/// One generative-model round trip driven by the mood bucket of the
/// sentiment label. Failures propagate as generation errors; nothing is
/// persisted on this path.
pub async fn personalized_response(
    State(state): State<AppState>,
    Json(payload): Json<PersonalizedRequest>,
) -> ApiResult<Json<PersonalizedResponse>> {
    let response = state.orchestrator.personalized_reply(&payload).await?;
    Ok(Json(response))
}

/// Build personalized response routes
pub fn personalized_routes() -> Router<AppState> {
    Router::new().route("/personalized_response", post(personalized_response))
}
