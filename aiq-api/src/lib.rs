//! aiq-api library - AI Quotient assessment service
//!
//! Stateless JSON API used by the marketing site: serves the question bank,
//! scores answer sets and forwards completed assessments to HubSpot.

use std::sync::Arc;

use aiq_common::{HubSpotClient, QuestionBank};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable question bank
    pub bank: Arc<QuestionBank>,
    /// Lead submission client
    pub hubspot: Arc<HubSpotClient>,
}

impl AppState {
    /// Create new application state
    pub fn new(bank: QuestionBank, hubspot: HubSpotClient) -> Self {
        Self {
            bank: Arc::new(bank),
            hubspot: Arc::new(hubspot),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let assessment = Router::new()
        .route("/api/questions", get(api::list_questions))
        .route("/api/pillars", get(api::list_pillars))
        .route("/api/score", post(api::score_answers))
        .route("/api/submit", post(api::submit_assessment));

    Router::new()
        .merge(assessment)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
