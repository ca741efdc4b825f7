//! Scoring engine
//!
//! Pure, deterministic mapping from a set of answers to an
//! [`AssessmentResult`]. No I/O and no hidden state: the same bank and
//! answers always yield an identical result.
//!
//! # Maximum score convention
//!
//! By default a pillar's maximum is fixed by the bank (4 × questions in that
//! pillar) and the overall maximum is 4 × bank size, whatever was answered.
//! Partial completion therefore lowers the percentage instead of inflating
//! it. [`MaxScoreBasis::AnsweredOnly`] reproduces the legacy site numbers,
//! where maxima only count answered questions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{Answer, Pillar};
use crate::questions::{QuestionBank, MAX_OPTION_VALUE};

/// Qualitative readiness band derived from the overall percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadinessLevel {
    #[serde(rename = "AI Innovator")]
    AiInnovator,

    #[serde(rename = "AI Ready")]
    AiReady,

    #[serde(rename = "AI Emerging")]
    AiEmerging,

    #[serde(rename = "AI Developing")]
    AiDeveloping,
}

impl ReadinessLevel {
    /// Classify an already-rounded overall percentage
    ///
    /// Bands are inclusive at their lower bound: 80+, 60-79, 40-59, below 40.
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            80.. => ReadinessLevel::AiInnovator,
            60..=79 => ReadinessLevel::AiReady,
            40..=59 => ReadinessLevel::AiEmerging,
            _ => ReadinessLevel::AiDeveloping,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReadinessLevel::AiInnovator => "AI Innovator",
            ReadinessLevel::AiReady => "AI Ready",
            ReadinessLevel::AiEmerging => "AI Emerging",
            ReadinessLevel::AiDeveloping => "AI Developing",
        }
    }

    /// "What this means" copy shown with the result
    pub fn description(&self) -> &'static str {
        match self {
            ReadinessLevel::AiInnovator => {
                "Your organization is leading the way in AI readiness with robust data infrastructure, advanced automation, and mature governance practices."
            }
            ReadinessLevel::AiReady => {
                "Your organization has a solid foundation for AI implementation with good data practices and automation capabilities."
            }
            ReadinessLevel::AiEmerging => {
                "Your organization is making progress toward AI readiness but has several areas that need improvement."
            }
            ReadinessLevel::AiDeveloping => {
                "Your organization is in the early stages of AI readiness and requires significant improvements across multiple areas."
            }
        }
    }
}

impl fmt::Display for ReadinessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How maximum scores are derived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxScoreBasis {
    /// Maxima come from the bank size (robust to partial completion)
    #[default]
    FixedBank,

    /// Maxima count only answered questions (legacy behavior)
    AnsweredOnly,
}

/// Score for one pillar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarScore {
    pub pillar: Pillar,
    /// Sum of answer values in this pillar
    pub score: u32,
    pub max_score: u32,
    /// round(100 × score / max_score), 0 when max_score is 0
    pub percentage: u32,
}

/// Overall assessment outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub total_score: u32,
    pub max_possible_score: u32,
    pub percentage: u32,
    pub readiness_level: ReadinessLevel,
    /// One entry per bank pillar, in bank order
    pub pillar_scores: Vec<PillarScore>,
}

impl AssessmentResult {
    /// Score for a single pillar, if the bank contains it
    pub fn pillar(&self, pillar: Pillar) -> Option<&PillarScore> {
        self.pillar_scores.iter().find(|p| p.pillar == pillar)
    }
}

/// Integer percentage, rounded half up (0 when `max` is 0)
pub fn percent(score: u32, max: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    let (score, max) = (u64::from(score), u64::from(max));
    ((200 * score + max) / (2 * max)) as u32
}

/// Score answers against a bank using the fixed-bank convention
pub fn score(bank: &QuestionBank, answers: &[Answer]) -> AssessmentResult {
    score_with(bank, answers, MaxScoreBasis::FixedBank)
}

/// Score answers against a bank with an explicit maximum-score convention
///
/// Answers whose pillar has no questions in `bank` contribute nothing.
pub fn score_with(bank: &QuestionBank, answers: &[Answer], basis: MaxScoreBasis) -> AssessmentResult {
    let pillar_scores: Vec<PillarScore> = bank
        .pillars()
        .into_iter()
        .map(|pillar| {
            let (score, answered) = answers
                .iter()
                .filter(|a| a.pillar == pillar)
                .fold((0u32, 0u32), |(sum, n), a| (sum + a.value, n + 1));

            let max_score = match basis {
                MaxScoreBasis::FixedBank => bank.pillar_max_score(pillar),
                MaxScoreBasis::AnsweredOnly => answered * MAX_OPTION_VALUE,
            };

            PillarScore {
                pillar,
                score,
                max_score,
                percentage: percent(score, max_score),
            }
        })
        .collect();

    let total_score = pillar_scores.iter().map(|p| p.score).sum();
    let max_possible_score = match basis {
        MaxScoreBasis::FixedBank => bank.max_score(),
        MaxScoreBasis::AnsweredOnly => pillar_scores.iter().map(|p| p.max_score).sum(),
    };
    let percentage = percent(total_score, max_possible_score);

    AssessmentResult {
        total_score,
        max_possible_score,
        percentage,
        readiness_level: ReadinessLevel::from_percentage(percentage),
        pillar_scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(question_id: u32, pillar: Pillar, value: u32) -> Answer {
        Answer {
            question_id,
            option_id: format!("{}X", question_id),
            value,
            pillar,
        }
    }

    #[test]
    fn test_readiness_boundaries() {
        let cases = [
            (100, ReadinessLevel::AiInnovator),
            (80, ReadinessLevel::AiInnovator),
            (79, ReadinessLevel::AiReady),
            (60, ReadinessLevel::AiReady),
            (59, ReadinessLevel::AiEmerging),
            (40, ReadinessLevel::AiEmerging),
            (39, ReadinessLevel::AiDeveloping),
            (0, ReadinessLevel::AiDeveloping),
        ];
        for (percentage, expected) in cases {
            assert_eq!(
                ReadinessLevel::from_percentage(percentage),
                expected,
                "percentage {}",
                percentage
            );
        }
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(9, 100), 9);
        assert_eq!(percent(1, 8), 13); // 12.5 rounds up
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(20, 20), 100);
    }

    #[test]
    fn test_empty_answers() {
        let bank = QuestionBank::standard();
        let result = score(&bank, &[]);

        assert_eq!(result.total_score, 0);
        assert_eq!(result.max_possible_score, 100);
        assert_eq!(result.percentage, 0);
        assert_eq!(result.readiness_level, ReadinessLevel::AiDeveloping);
        assert_eq!(result.pillar_scores.len(), 5);
        for pillar in &result.pillar_scores {
            assert_eq!(pillar.score, 0);
            assert_eq!(pillar.max_score, 20);
            assert_eq!(pillar.percentage, 0);
        }
    }

    #[test]
    fn test_literal_example_fixed_bank() {
        let bank = QuestionBank::standard();
        let answers = [
            answer(1, Pillar::DataSpineHealth, 3),
            answer(6, Pillar::DataSpineHealth, 4),
            answer(2, Pillar::FunnelIntelligence, 2),
        ];

        let result = score(&bank, &answers);
        assert_eq!(result.total_score, 9);
        assert_eq!(result.max_possible_score, 100);
        assert_eq!(result.percentage, 9);
        assert_eq!(result.readiness_level, ReadinessLevel::AiDeveloping);

        let dsh = result.pillar(Pillar::DataSpineHealth).unwrap();
        assert_eq!((dsh.score, dsh.max_score, dsh.percentage), (7, 20, 35));
    }

    #[test]
    fn test_literal_example_answered_only_diverges() {
        let bank = QuestionBank::standard();
        let answers = [
            answer(1, Pillar::DataSpineHealth, 3),
            answer(6, Pillar::DataSpineHealth, 4),
            answer(2, Pillar::FunnelIntelligence, 2),
        ];

        let result = score_with(&bank, &answers, MaxScoreBasis::AnsweredOnly);
        assert_eq!(result.total_score, 9);
        assert_eq!(result.max_possible_score, 12);
        assert_eq!(result.percentage, 75);
        assert_eq!(result.readiness_level, ReadinessLevel::AiReady);
    }

    #[test]
    fn test_one_answer_per_pillar_uses_bank_size() {
        let bank = QuestionBank::standard();
        let answers: Vec<Answer> = Pillar::ALL
            .iter()
            .enumerate()
            .map(|(i, p)| answer(i as u32 + 1, *p, 3))
            .collect();

        let result = score(&bank, &answers);
        for pillar in &result.pillar_scores {
            assert_eq!(pillar.max_score, 20);
            assert_eq!(pillar.percentage, 15);
        }
        assert_eq!(result.total_score, 15);
        assert_eq!(result.percentage, 15);

        let legacy = score_with(&bank, &answers, MaxScoreBasis::AnsweredOnly);
        assert!(legacy.pillar_scores.iter().all(|p| p.percentage == 75));
        assert_eq!(legacy.percentage, 75);
    }

    #[test]
    fn test_full_completion_at_max() {
        let bank = QuestionBank::standard();
        let answers: Vec<Answer> = bank
            .questions()
            .iter()
            .map(|q| bank.answer_for(q.id, &format!("{}D", q.id)).unwrap())
            .collect();

        let result = score(&bank, &answers);
        assert_eq!(result.total_score, 100);
        assert_eq!(result.percentage, 100);
        assert_eq!(result.readiness_level, ReadinessLevel::AiInnovator);
        assert!(result.pillar_scores.iter().all(|p| p.percentage == 100));
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let bank = QuestionBank::standard();
        let answers = [
            answer(3, Pillar::AutomationMaturity, 2),
            answer(4, Pillar::ContentOperations, 4),
        ];
        assert_eq!(score(&bank, &answers), score(&bank, &answers));
    }

    #[test]
    fn test_adding_answer_never_decreases_scores() {
        let bank = QuestionBank::standard();
        let mut answers = vec![answer(1, Pillar::DataSpineHealth, 2)];
        let before = score(&bank, &answers);

        answers.push(answer(6, Pillar::DataSpineHealth, 4));
        let after = score(&bank, &answers);

        assert!(after.total_score >= before.total_score);
        let before_dsh = before.pillar(Pillar::DataSpineHealth).unwrap().score;
        let after_dsh = after.pillar(Pillar::DataSpineHealth).unwrap().score;
        assert!(after_dsh >= before_dsh);
    }

    #[test]
    fn test_pillar_absent_from_bank_is_ignored() {
        // Quick bank without the governance question
        let questions: Vec<_> = QuestionBank::quick()
            .questions()
            .iter()
            .filter(|q| q.pillar != Pillar::Governance)
            .cloned()
            .collect();
        let bank = QuestionBank::new(questions).unwrap();

        let answers = [
            answer(1, Pillar::DataSpineHealth, 4),
            answer(5, Pillar::Governance, 4),
        ];
        let result = score(&bank, &answers);

        assert_eq!(result.total_score, 4);
        assert_eq!(result.max_possible_score, 16);
        assert_eq!(result.percentage, 25);
        assert!(result.pillar(Pillar::Governance).is_none());
    }

    #[test]
    fn test_result_json_shape() {
        let bank = QuestionBank::standard();
        let result = score(&bank, &[answer(1, Pillar::DataSpineHealth, 4)]);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["totalScore"], 4);
        assert_eq!(json["maxPossibleScore"], 100);
        assert_eq!(json["readinessLevel"], "AI Developing");
        assert_eq!(json["pillarScores"][0]["pillar"], "Data Spine Health");
        assert_eq!(json["pillarScores"][0]["maxScore"], 20);
    }
}
