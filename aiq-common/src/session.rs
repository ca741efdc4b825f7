//! Assessment session state machine
//!
//! One session belongs to one respondent. It owns the current step, the
//! respondent's details, the answer set and the question pointer.
//!
//! ```text
//! user-info ⇄ questions ⇄ results ⇄ submit ⇄ thank-you
//! ```
//!
//! Forward edges have preconditions (valid details, every question answered,
//! an explicit submit, an attempted CRM post). Backward edges only require
//! not being at the first step. Calls made in the wrong step return
//! [`Error::InvalidState`] and leave the session unchanged.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::model::{Answer, Pillar, Question, UserInfo};
use crate::questions::QuestionBank;
use crate::scoring::{self, percent, AssessmentResult};
use crate::submission::{HubSpotClient, PageContext, SubmissionOutcome, SubmissionPayload};
use crate::{Error, Result};

/// Steps of the assessment flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssessmentStep {
    UserInfo,
    Questions,
    Results,
    Submit,
    ThankYou,
}

impl AssessmentStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentStep::UserInfo => "user-info",
            AssessmentStep::Questions => "questions",
            AssessmentStep::Results => "results",
            AssessmentStep::Submit => "submit",
            AssessmentStep::ThankYou => "thank-you",
        }
    }

    /// Following step, `None` at the terminal step
    pub fn next(&self) -> Option<Self> {
        match self {
            AssessmentStep::UserInfo => Some(AssessmentStep::Questions),
            AssessmentStep::Questions => Some(AssessmentStep::Results),
            AssessmentStep::Results => Some(AssessmentStep::Submit),
            AssessmentStep::Submit => Some(AssessmentStep::ThankYou),
            AssessmentStep::ThankYou => None,
        }
    }

    /// Preceding step, `None` at the initial step
    pub fn previous(&self) -> Option<Self> {
        match self {
            AssessmentStep::UserInfo => None,
            AssessmentStep::Questions => Some(AssessmentStep::UserInfo),
            AssessmentStep::Results => Some(AssessmentStep::Questions),
            AssessmentStep::Submit => Some(AssessmentStep::Results),
            AssessmentStep::ThankYou => Some(AssessmentStep::Submit),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for AssessmentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the respondent is within the current question's pillar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PillarProgress {
    pub pillar: Pillar,
    /// Questions in this pillar
    pub question_count: usize,
    /// 1-based position of the current question inside the pillar
    pub position: usize,
}

/// In-progress assessment for one respondent
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    id: Uuid,
    bank: Arc<QuestionBank>,
    step: AssessmentStep,
    user_info: Option<UserInfo>,
    answers: BTreeMap<u32, Answer>,
    current_index: usize,
    submission: Option<SubmissionOutcome>,
    started_at: DateTime<Utc>,
}

impl AssessmentSession {
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self {
            id: Uuid::new_v4(),
            bank,
            step: AssessmentStep::UserInfo,
            user_info: None,
            answers: BTreeMap::new(),
            current_index: 0,
            submission: None,
            started_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn step(&self) -> AssessmentStep {
        self.step
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Time since the session started (or was last reset)
    pub fn elapsed(&self) -> Duration {
        Utc::now() - self.started_at
    }

    pub fn user_info(&self) -> Option<&UserInfo> {
        self.user_info.as_ref()
    }

    /// Question pointer (equals the bank length once every question is answered)
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Question under the pointer while in the questions step
    pub fn current_question(&self) -> Option<&Question> {
        if self.step != AssessmentStep::Questions {
            return None;
        }
        self.bank.get(self.current_index)
    }

    /// Collected answers in question id order
    pub fn answers(&self) -> Vec<Answer> {
        self.answers.values().cloned().collect()
    }

    pub fn answer_for(&self, question_id: u32) -> Option<&Answer> {
        self.answers.get(&question_id)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Share of the bank answered, rounded percentage
    pub fn progress(&self) -> u32 {
        percent(self.answers.len() as u32, self.bank.len() as u32)
    }

    /// Pillar context for the current question
    pub fn pillar_progress(&self) -> Option<PillarProgress> {
        let question = self.current_question()?;
        let pillar = question.pillar;
        let position = self
            .bank
            .questions_in(pillar)
            .position(|q| q.id == question.id)
            .map(|i| i + 1)?;

        Some(PillarProgress {
            pillar,
            question_count: self.bank.question_count(pillar),
            position,
        })
    }

    /// Last submission attempt, if any
    pub fn submission(&self) -> Option<&SubmissionOutcome> {
        self.submission.as_ref()
    }

    /// Scores for the current answer set, recomputed on every call
    pub fn result(&self) -> AssessmentResult {
        scoring::score(&self.bank, &self.answers())
    }

    /// Accept respondent details and start the questions
    ///
    /// On validation failure the session stays on `user-info`.
    pub fn submit_user_info(&mut self, info: UserInfo) -> Result<()> {
        self.expect_step(AssessmentStep::UserInfo, "submit user info")?;

        let info = info.normalized();
        info.validate()?;

        info!(
            session_id = %self.id,
            company = %info.company,
            "Assessment started"
        );

        self.user_info = Some(info);
        self.current_index = 0;
        self.step = if self.bank.is_empty() {
            AssessmentStep::Results
        } else {
            AssessmentStep::Questions
        };
        Ok(())
    }

    /// Record an answer for the current question and advance the pointer
    ///
    /// Any earlier answer for the same question is replaced. The value and
    /// pillar are re-derived from the bank.
    pub fn submit_answer(&mut self, answer: Answer) -> Result<()> {
        self.expect_step(AssessmentStep::Questions, "submit an answer")?;

        let current = self
            .bank
            .get(self.current_index)
            .ok_or_else(|| Error::InvalidState("No current question".to_string()))?;

        if answer.question_id != current.id {
            return Err(Error::InvalidInput(format!(
                "Answer is for question {}, current question is {}",
                answer.question_id, current.id
            )));
        }

        let answer = self.bank.answer_for(answer.question_id, &answer.option_id)?;
        debug!(
            session_id = %self.id,
            question_id = answer.question_id,
            option_id = %answer.option_id,
            value = answer.value,
            "Answer recorded"
        );

        self.answers.insert(answer.question_id, answer);
        self.current_index += 1;

        if self.current_index >= self.bank.len() {
            self.step = AssessmentStep::Results;
            let result = self.result();
            info!(
                session_id = %self.id,
                percentage = result.percentage,
                readiness = %result.readiness_level,
                elapsed_secs = self.elapsed().num_seconds(),
                "Assessment completed"
            );
        }

        Ok(())
    }

    /// Answer the current question by option id
    pub fn answer_current(&mut self, option_id: &str) -> Result<()> {
        let question_id = self
            .current_question()
            .map(|q| q.id)
            .ok_or_else(|| Error::InvalidState(format!("No question to answer in step {}", self.step)))?;

        let answer = self.bank.answer_for(question_id, option_id)?;
        self.submit_answer(answer)
    }

    /// Move back one question or one step; no-op on the first step
    pub fn previous(&mut self) -> AssessmentStep {
        match self.step {
            AssessmentStep::UserInfo => {}
            AssessmentStep::Questions => {
                if self.current_index > 0 {
                    self.current_index -= 1;
                } else {
                    self.step = AssessmentStep::UserInfo;
                }
            }
            AssessmentStep::Results => {
                if self.bank.is_empty() {
                    self.step = AssessmentStep::UserInfo;
                } else {
                    self.current_index = self.bank.len() - 1;
                    self.step = AssessmentStep::Questions;
                }
            }
            AssessmentStep::Submit => self.step = AssessmentStep::Results,
            AssessmentStep::ThankYou => self.step = AssessmentStep::Submit,
        }

        debug!(session_id = %self.id, step = %self.step, index = self.current_index, "Moved back");
        self.step
    }

    /// Explicit submit action from the results view
    pub fn request_submission(&mut self) -> Result<()> {
        self.expect_step(AssessmentStep::Results, "request submission")?;

        if self.answers.len() < self.bank.len() {
            return Err(Error::InvalidState(format!(
                "{} of {} questions answered",
                self.answers.len(),
                self.bank.len()
            )));
        }

        self.step = AssessmentStep::Submit;
        Ok(())
    }

    /// Build the CRM payload for this respondent
    pub fn submission_payload(&self, client: &HubSpotClient, context: PageContext) -> Result<SubmissionPayload> {
        let user_info = self
            .user_info
            .as_ref()
            .ok_or_else(|| Error::InvalidState("No respondent details captured".to_string()))?;

        Ok(client.build_payload(user_info, &self.result(), &self.answers(), context))
    }

    /// Record a submission attempt and move to the thank-you step
    ///
    /// The step advances whatever the outcome; lead capture never blocks
    /// the respondent.
    pub fn record_submission(&mut self, outcome: SubmissionOutcome) -> Result<()> {
        self.expect_step(AssessmentStep::Submit, "record a submission")?;

        info!(
            session_id = %self.id,
            success = outcome.is_success(),
            elapsed_secs = self.elapsed().num_seconds(),
            "Assessment submission recorded"
        );

        self.submission = Some(outcome);
        self.step = AssessmentStep::ThankYou;
        Ok(())
    }

    /// Post to the CRM once and record the outcome
    pub async fn submit(&mut self, client: &HubSpotClient, context: PageContext) -> Result<SubmissionOutcome> {
        self.expect_step(AssessmentStep::Submit, "submit results")?;

        let payload = self.submission_payload(client, context)?;
        let outcome = client.submit(&payload).await;
        self.record_submission(outcome.clone())?;
        Ok(outcome)
    }

    /// Discard everything and start over
    pub fn reset(&mut self) {
        debug!(session_id = %self.id, "Assessment reset");
        *self = Self::new(Arc::clone(&self.bank));
    }

    fn expect_step(&self, expected: AssessmentStep, action: &str) -> Result<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(Error::InvalidState(format!(
                "Cannot {} in step {} (expected {})",
                action, self.step, expected
            )))
        }
    }
}
