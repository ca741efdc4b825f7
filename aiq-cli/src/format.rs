//! Terminal rendering for the assessment views

use aiq_common::session::PillarProgress;
use aiq_common::{AssessmentResult, Question, SubmissionOutcome};

/// Width of the pillar label column in the breakdown
const LABEL_WIDTH: usize = 36;

/// Letters shown next to options, in bank order
pub const OPTION_KEYS: [char; 4] = ['a', 'b', 'c', 'd'];

/// Formatter for the terminal runner
pub struct CliFormatter;

impl CliFormatter {
    pub fn format_banner(question_count: usize) -> String {
        format!(
            "AI Quotient Assessment\n\
             ======================\n\
             {} questions across five pillars. Answer with 1-4 or a-d;\n\
             'p' goes back, 'r' restarts, 'q' quits.\n",
            question_count
        )
    }

    /// Question with progress header
    ///
    /// Example:
    /// ```text
    /// Question 3 of 25 (8% complete)
    /// Automation Maturity, 1 of 5
    /// ```
    pub fn format_question(
        question: &Question,
        index: usize,
        total: usize,
        progress: u32,
        pillar: Option<PillarProgress>,
        selected: Option<&str>,
    ) -> String {
        let mut out = format!("\nQuestion {} of {} ({}% complete)\n", index + 1, total, progress);
        if let Some(p) = pillar {
            out.push_str(&format!("{}, {} of {}\n", p.pillar, p.position, p.question_count));
        }
        out.push_str(&format!("\n{}\n", question.text));

        for (i, option) in question.options.iter().enumerate() {
            let marker = if selected == Some(option.option_id.as_str()) { '*' } else { ' ' };
            let key = OPTION_KEYS.get(i).copied().unwrap_or('?');
            out.push_str(&format!(" {} {}/{}) {}\n", marker, i + 1, key, option.text));
        }
        out
    }

    /// Overall result with the per-pillar breakdown
    pub fn format_result(result: &AssessmentResult) -> String {
        let mut out = format!(
            "\nYour AI Quotient: {}% ({})\n{}\n\nScore: {} / {}\n\nPillar breakdown:\n",
            result.percentage,
            result.readiness_level,
            result.readiness_level.description(),
            result.total_score,
            result.max_possible_score
        );

        for pillar in &result.pillar_scores {
            out.push_str(&format!(
                "  {:<width$}{:>4}%  ({}/{})\n",
                pillar.pillar.label(),
                pillar.percentage,
                pillar.score,
                pillar.max_score,
                width = LABEL_WIDTH
            ));
        }
        out
    }

    pub fn format_thank_you(outcome: Option<&SubmissionOutcome>) -> String {
        let detail = match outcome {
            Some(SubmissionOutcome::Accepted) => {
                "Your results have been sent. Our team will be in touch with next steps.".to_string()
            }
            Some(SubmissionOutcome::Rejected { code, .. }) => {
                format!("We could not save your results (HTTP {}), but your score above still stands.", code)
            }
            Some(SubmissionOutcome::Failed { message }) => {
                format!("We could not save your results ({}), but your score above still stands.", message)
            }
            Some(SubmissionOutcome::Skipped { reason }) => format!("Results were not sent: {}.", reason),
            None => "Results were not sent.".to_string(),
        };
        format!("\nThank you for completing the AI Quotient assessment!\n{}\n", detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiq_common::{scoring, QuestionBank};

    #[test]
    fn test_question_marks_selected_option() {
        let bank = QuestionBank::quick();
        let question = bank.get(0).unwrap();

        let text = CliFormatter::format_question(question, 0, bank.len(), 0, None, Some("1B"));
        assert!(text.contains("Question 1 of 5 (0% complete)"));
        assert!(text.contains(" * 2/b) "));
        assert!(text.contains("   1/a) "));
    }

    #[test]
    fn test_result_lists_every_pillar() {
        let bank = QuestionBank::standard();
        let result = scoring::score(&bank, &[]);

        let text = CliFormatter::format_result(&result);
        assert!(text.contains("Your AI Quotient: 0% (AI Developing)"));
        for pillar in bank.pillars() {
            assert!(text.contains(pillar.label()));
        }
        assert!(text.contains("(0/20)"));
    }

    #[test]
    fn test_thank_you_mentions_failure() {
        let outcome = SubmissionOutcome::Rejected {
            code: 400,
            message: "bad".to_string(),
        };
        let text = CliFormatter::format_thank_you(Some(&outcome));
        assert!(text.contains("HTTP 400"));
        assert!(text.contains("Thank you"));
    }
}
