//! Question bank endpoints

use aiq_common::{Pillar, Question};
use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Question bank response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsResponse {
    pub total: usize,
    pub max_possible_score: u32,
    pub questions: Vec<Question>,
}

/// Pillar summary entry
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarSummary {
    pub pillar: Pillar,
    pub question_count: usize,
    pub max_score: u32,
    /// CRM property carrying this pillar's percentage
    pub field: String,
}

/// GET /api/questions
pub async fn list_questions(State(state): State<AppState>) -> Json<QuestionsResponse> {
    Json(QuestionsResponse {
        total: state.bank.len(),
        max_possible_score: state.bank.max_score(),
        questions: state.bank.questions().to_vec(),
    })
}

/// GET /api/pillars
///
/// Pillars in bank order.
pub async fn list_pillars(State(state): State<AppState>) -> Json<Vec<PillarSummary>> {
    let pillars = state
        .bank
        .pillars()
        .into_iter()
        .map(|pillar| PillarSummary {
            pillar,
            question_count: state.bank.question_count(pillar),
            max_score: state.bank.pillar_max_score(pillar),
            field: pillar.score_field(),
        })
        .collect();

    Json(pillars)
}
