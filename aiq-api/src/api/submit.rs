//! Lead submission endpoint
//!
//! Replays the respondent's details and answers through an
//! [`AssessmentSession`] so the same step rules apply as in any other front
//! end, then posts the lead to HubSpot once.

use std::sync::Arc;

use aiq_common::submission::PageContext;
use aiq_common::{AssessmentResult, AssessmentSession, SubmissionOutcome, UserInfo};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::score::{resolve_answers, AnswerChoice};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /api/submit request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub user_info: UserInfo,
    pub answers: Vec<AnswerChoice>,
    /// Overrides the configured page context when present
    #[serde(default)]
    pub page_uri: Option<String>,
    #[serde(default)]
    pub page_name: Option<String>,
}

/// Submission response
///
/// `submitted` is false whenever the CRM did not accept the lead; the
/// request itself still succeeds so the site can show its thank-you view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub submitted: bool,
    pub outcome: SubmissionOutcome,
    pub result: AssessmentResult,
}

/// Drive a fresh session to the submit step
pub fn replay_session(
    state: &AppState,
    user_info: UserInfo,
    choices: &[AnswerChoice],
) -> ApiResult<AssessmentSession> {
    let mut session = AssessmentSession::new(Arc::clone(&state.bank));
    session.submit_user_info(user_info)?;

    let answers = resolve_answers(&state.bank, choices)?;
    for question in state.bank.questions() {
        let answer = answers
            .iter()
            .find(|a| a.question_id == question.id)
            .ok_or_else(|| {
                ApiError::BadRequest(format!("Question {} has not been answered", question.id))
            })?;
        session.submit_answer(answer.clone())?;
    }

    session.request_submission()?;
    Ok(session)
}

/// POST /api/submit
pub async fn submit_assessment(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> ApiResult<Json<SubmitResponse>> {
    let mut session = replay_session(&state, request.user_info, &request.answers)?;

    let defaults = state.hubspot.default_context();
    let context = PageContext::new(
        request.page_uri.unwrap_or(defaults.page_uri),
        request.page_name.unwrap_or(defaults.page_name),
    );

    let outcome = session.submit(&state.hubspot, context).await?;
    let result = session.result();

    info!(
        session_id = %session.id(),
        percentage = result.percentage,
        submitted = outcome.is_success(),
        "Assessment lead processed"
    );

    Ok(Json(SubmitResponse {
        submitted: outcome.is_success(),
        outcome,
        result,
    }))
}
