//! Scoring endpoint

use std::collections::BTreeMap;

use aiq_common::scoring::{self, AssessmentResult};
use aiq_common::{Answer, QuestionBank};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::AppState;

/// A respondent's pick, as sent by the site
///
/// Only ids travel over the wire; values and pillars come from the bank.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerChoice {
    pub question_id: u32,
    pub option_id: String,
}

/// POST /api/score request body
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub answers: Vec<AnswerChoice>,
}

/// Scoring response: the result plus its "what this means" copy
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    #[serde(flatten)]
    pub result: AssessmentResult,
    pub answered: usize,
    pub readiness_description: String,
}

impl ScoreResponse {
    pub fn new(result: AssessmentResult, answered: usize) -> Self {
        let readiness_description = result.readiness_level.description().to_string();
        Self {
            result,
            answered,
            readiness_description,
        }
    }
}

/// Resolve choices against the bank; a later choice for the same question wins
pub fn resolve_answers(bank: &QuestionBank, choices: &[AnswerChoice]) -> ApiResult<Vec<Answer>> {
    let mut answers = BTreeMap::new();
    for choice in choices {
        let answer = bank.answer_for(choice.question_id, &choice.option_id)?;
        answers.insert(answer.question_id, answer);
    }
    Ok(answers.into_values().collect())
}

/// POST /api/score
///
/// Scores any subset of the bank, including none.
pub async fn score_answers(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> ApiResult<Json<ScoreResponse>> {
    let answers = resolve_answers(&state.bank, &request.answers)?;
    let result = scoring::score(&state.bank, &answers);

    debug!(
        answered = answers.len(),
        percentage = result.percentage,
        "Scored answer set"
    );

    Ok(Json(ScoreResponse::new(result, answers.len())))
}
