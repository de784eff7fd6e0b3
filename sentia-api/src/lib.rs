//! sentia-api library interface
//!
//! Exposes the router, application state and orchestration pipeline for
//! the binary and for integration tests (which substitute stub models).

pub mod api;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod score;
pub mod telemetry;

pub use crate::error::{ApiError, ApiResult};
pub use crate::orchestrator::Orchestrator;

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
///
/// Collaborators live behind the orchestrator, injected at construction;
/// no module-scope singletons.
#[derive(Clone)]
pub struct AppState {
    /// Endpoint orchestration pipeline
    pub orchestrator: Arc<Orchestrator>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::status_routes())
        .merge(api::sentiment_routes())
        .merge(api::analysis_routes())
        .merge(api::personalized_routes())
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
