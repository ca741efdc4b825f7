//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response: status, module name, version
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    /// Source revision stamped at build time
    pub revision: String,
    /// Lead submission has portal and form ids
    pub hubspot_configured: bool,
    pub question_count: usize,
}

/// GET /health
///
/// Health check endpoint for monitoring.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "aiq-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        revision: env!("AIQ_REVISION").to_string(),
        hubspot_configured: state.hubspot.is_configured(),
        question_count: state.bank.len(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
