//! Service status endpoint

use axum::{extract::State, routing::get, Json, Router};

use sentia_common::api::types::StatusResponse;

use crate::{ApiResult, AppState};

/// GET /status
///
/// Returns the persisted service status record, creating it on first
/// access. The response always reflects the stored row.
pub async fn get_status(State(state): State<AppState>) -> ApiResult<Json<StatusResponse>> {
    let status = state.orchestrator.get_status().await?;
    Ok(Json(status))
}

/// Build status routes
pub fn status_routes() -> Router<AppState> {
    Router::new().route("/status", get(get_status))
}
