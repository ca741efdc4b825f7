//! End-to-end tests of the assessment flow on the standard bank
//!
//! Covers the respondent's path user-info → questions → results → submit →
//! thank-you, scoring of complete and partial answer sets, and the
//! dry-run path where no CRM call is made.

use aiq_common::scoring::{self, MaxScoreBasis};
use aiq_common::{
    AssessmentSession, AssessmentStep, Pillar, QuestionBank, ReadinessLevel, SubmissionOutcome,
    UserInfo,
};
use std::sync::Arc;

fn start(bank: QuestionBank) -> AssessmentSession {
    let mut session = AssessmentSession::new(Arc::new(bank));
    session
        .submit_user_info(UserInfo::new("Jane", "Doe", "jane@x.com", "Acme"))
        .unwrap();
    session
}

#[test]
fn test_full_flow_with_mixed_answers() {
    let mut session = start(QuestionBank::standard());

    // Data Spine Health questions at D, everything else at A
    while let Some(question) = session.current_question().cloned() {
        let suffix = if question.pillar == Pillar::DataSpineHealth { 'D' } else { 'A' };
        session
            .answer_current(&format!("{}{}", question.id, suffix))
            .unwrap();
    }

    assert_eq!(session.step(), AssessmentStep::Results);
    let result = session.result();
    assert_eq!(result.total_score, 20 + 20);
    assert_eq!(result.percentage, 40);
    assert_eq!(result.readiness_level, ReadinessLevel::AiEmerging);
    assert_eq!(result.pillar(Pillar::DataSpineHealth).unwrap().percentage, 100);
    assert_eq!(result.pillar(Pillar::Governance).unwrap().percentage, 25);

    session.request_submission().unwrap();
    session
        .record_submission(SubmissionOutcome::Skipped {
            reason: "dry run".to_string(),
        })
        .unwrap();
    assert_eq!(session.step(), AssessmentStep::ThankYou);
}

#[test]
fn test_result_matches_direct_scoring() {
    let mut session = start(QuestionBank::standard());
    for option in ["1B", "2C", "3D"] {
        session.answer_current(option).unwrap();
    }

    let direct = scoring::score(session.bank(), &session.answers());
    assert_eq!(session.result(), direct);
    assert_eq!(direct.total_score, 9);
}

#[test]
fn test_partial_completion_does_not_inflate() {
    let mut session = start(QuestionBank::standard());
    for option in ["1D", "2D", "3D", "4D", "5D"] {
        session.answer_current(option).unwrap();
    }
    let answers = session.answers();

    let fixed = scoring::score_with(session.bank(), &answers, MaxScoreBasis::FixedBank);
    assert_eq!(fixed.percentage, 20);
    assert_eq!(fixed.readiness_level, ReadinessLevel::AiDeveloping);

    let legacy = scoring::score_with(session.bank(), &answers, MaxScoreBasis::AnsweredOnly);
    assert_eq!(legacy.percentage, 100);
    assert_eq!(legacy.readiness_level, ReadinessLevel::AiInnovator);
}

#[test]
fn test_cannot_submit_before_finishing() {
    let mut session = start(QuestionBank::standard());
    session.answer_current("1A").unwrap();
    assert!(session.request_submission().is_err());
    assert_eq!(session.step(), AssessmentStep::Questions);
}

#[test]
fn test_edit_user_info_after_going_back() {
    let mut session = start(QuestionBank::quick());
    session.answer_current("1C").unwrap();
    session.previous();
    session.previous();
    assert_eq!(session.step(), AssessmentStep::UserInfo);

    let mut corrected = UserInfo::new("Jane", "Doe", "jane@acme.com", "Acme Corp");
    corrected.job_title = "VP Marketing".to_string();
    session.submit_user_info(corrected).unwrap();

    assert_eq!(session.step(), AssessmentStep::Questions);
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.user_info().unwrap().company, "Acme Corp");
    // Earlier answer is kept and can be replaced
    assert_eq!(session.answer_for(1).unwrap().option_id, "1C");
}
