//! HTTP API endpoints for sentia-api

pub mod analysis;
pub mod health;
pub mod personalized;
pub mod sentiment;
pub mod status;

pub use analysis::analysis_routes;
pub use health::health_routes;
pub use personalized::personalized_routes;
pub use sentiment::sentiment_routes;
pub use status::status_routes;
