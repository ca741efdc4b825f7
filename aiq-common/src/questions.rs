//! Question bank for the AI Quotient assessment
//!
//! The bank is an immutable value. Sessions and the scoring engine receive it
//! explicitly (usually as `Arc<QuestionBank>`) instead of reading a global.

use std::collections::HashSet;

use crate::model::{Answer, Pillar, Question, QuestionOption};
use crate::{Error, Result};

/// Options per question
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Highest ordinal value an option can carry
pub const MAX_OPTION_VALUE: u32 = 4;

/// Questions per pillar in the standard instrument
pub const QUESTIONS_PER_PILLAR: usize = 5;

const OPTION_SUFFIXES: [char; OPTIONS_PER_QUESTION] = ['A', 'B', 'C', 'D'];

/// Ordered, immutable list of assessment questions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank from arbitrary questions, enforcing bank invariants
    ///
    /// - question ids are unique and positive
    /// - each question has exactly 4 options valued {1,2,3,4}
    /// - option ids are unique within the bank
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        let mut seen_ids = HashSet::new();
        let mut seen_options = HashSet::new();

        for question in &questions {
            if question.id == 0 {
                return Err(Error::InvalidInput("Question ids must be positive".to_string()));
            }
            if !seen_ids.insert(question.id) {
                return Err(Error::InvalidInput(format!(
                    "Duplicate question id {}",
                    question.id
                )));
            }
            if question.options.len() != OPTIONS_PER_QUESTION {
                return Err(Error::InvalidInput(format!(
                    "Question {} has {} options, expected {}",
                    question.id,
                    question.options.len(),
                    OPTIONS_PER_QUESTION
                )));
            }

            let mut values: Vec<u32> = question.options.iter().map(|o| o.value).collect();
            values.sort_unstable();
            if values != [1, 2, 3, 4] {
                return Err(Error::InvalidInput(format!(
                    "Question {} option values must be 1..=4 without gaps, got {:?}",
                    question.id, values
                )));
            }

            for option in &question.options {
                if !seen_options.insert(option.option_id.as_str()) {
                    return Err(Error::InvalidInput(format!(
                        "Duplicate option id {}",
                        option.option_id
                    )));
                }
            }
        }

        Ok(Self { questions })
    }

    /// The fixed 25-question instrument, five questions per pillar
    pub fn standard() -> Self {
        Self {
            questions: standard_questions(),
        }
    }

    /// Short form: the first question of every pillar
    pub fn quick() -> Self {
        Self::standard().first_per_pillar()
    }

    /// Keep only the first question of each pillar, preserving bank order
    pub fn first_per_pillar(&self) -> Self {
        let mut kept = HashSet::new();
        let questions = self
            .questions
            .iter()
            .filter(|q| kept.insert(q.pillar))
            .cloned()
            .collect();
        Self { questions }
    }

    /// Check the standard shape: every pillar present with exactly five questions
    pub fn validate_standard_shape(&self) -> Result<()> {
        for pillar in Pillar::ALL {
            let count = self.question_count(pillar);
            if count != QUESTIONS_PER_PILLAR {
                return Err(Error::InvalidInput(format!(
                    "Pillar '{}' has {} questions, expected {}",
                    pillar, count, QUESTIONS_PER_PILLAR
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Question at a position in bank order
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Question by id
    pub fn find(&self, question_id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Position of a question in bank order
    pub fn index_of(&self, question_id: u32) -> Option<usize> {
        self.questions.iter().position(|q| q.id == question_id)
    }

    /// Pillars present in the bank, in order of first appearance
    pub fn pillars(&self) -> Vec<Pillar> {
        let mut pillars = Vec::new();
        for question in &self.questions {
            if !pillars.contains(&question.pillar) {
                pillars.push(question.pillar);
            }
        }
        pillars
    }

    pub fn questions_in(&self, pillar: Pillar) -> impl Iterator<Item = &Question> + '_ {
        self.questions.iter().filter(move |q| q.pillar == pillar)
    }

    pub fn question_count(&self, pillar: Pillar) -> usize {
        self.questions_in(pillar).count()
    }

    /// Maximum attainable score for one pillar
    pub fn pillar_max_score(&self, pillar: Pillar) -> u32 {
        self.question_count(pillar) as u32 * MAX_OPTION_VALUE
    }

    /// Maximum attainable score for the whole bank
    pub fn max_score(&self) -> u32 {
        self.questions.len() as u32 * MAX_OPTION_VALUE
    }

    /// Resolve a `(question, option)` choice into a denormalized [`Answer`]
    pub fn answer_for(&self, question_id: u32, option_id: &str) -> Result<Answer> {
        let question = self
            .find(question_id)
            .ok_or_else(|| Error::NotFound(format!("Question {}", question_id)))?;

        let option = question.option(option_id).ok_or_else(|| {
            Error::InvalidInput(format!(
                "Option '{}' does not belong to question {}",
                option_id, question_id
            ))
        })?;

        Ok(Answer {
            question_id,
            option_id: option.option_id.clone(),
            value: option.value,
            pillar: question.pillar,
        })
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::standard()
    }
}

fn question(id: u32, pillar: Pillar, text: &str, choices: [&str; OPTIONS_PER_QUESTION]) -> Question {
    let options = choices
        .iter()
        .zip(OPTION_SUFFIXES)
        .enumerate()
        .map(|(i, (choice, suffix))| QuestionOption {
            option_id: format!("{}{}", id, suffix),
            text: (*choice).to_string(),
            value: i as u32 + 1,
        })
        .collect();

    Question {
        id,
        text: text.to_string(),
        pillar,
        options,
    }
}

fn standard_questions() -> Vec<Question> {
    use Pillar::*;

    vec![
        question(1, DataSpineHealth, "How are your primary RevOps data sources integrated?", [
            "Manual exports/imports",
            "Some point-to-point sync",
            "Near-real-time native/middleware sync",
            "Central lakehouse gives real-time, bidirectional access",
        ]),
        question(2, FunnelIntelligence, "How do you track attribution across marketing touchpoints?", [
            "Basic last-click attribution only",
            "Multi-touch attribution for some channels",
            "Comprehensive multi-touch attribution across channels",
            "AI-powered attribution with predictive modeling",
        ]),
        question(3, AutomationMaturity, "What level of automation exists in your marketing workflows?", [
            "Minimal automation, mostly manual processes",
            "Basic email automation and some triggered workflows",
            "Cross-channel automation with conditional logic",
            "Advanced predictive automation with self-optimizing workflows",
        ]),
        question(4, ContentOperations, "How structured is your content for AI utilization?", [
            "Unstructured content with minimal metadata",
            "Partially structured with basic tagging",
            "Well-structured content with comprehensive metadata",
            "Fully structured content with semantic tagging and AI-ready APIs",
        ]),
        question(5, Governance, "How would you describe your organization's approach to AI governance?", [
            "No formal governance structure for AI",
            "Basic policies in place but limited enforcement",
            "Comprehensive governance framework with regular reviews",
            "Advanced governance with ethics committee and continuous monitoring",
        ]),
        question(6, DataSpineHealth, "How would you describe the quality of your customer data?", [
            "Fragmented with significant quality issues",
            "Partially consolidated with some data cleaning",
            "Well-maintained with regular quality checks",
            "Comprehensive data quality framework with automated enrichment",
        ]),
        question(7, FunnelIntelligence, "How is pipeline forecasting performed?", [
            "Gut feel and spreadsheet roll-ups",
            "CRM stage-weighted forecasts reviewed monthly",
            "Historical conversion models refreshed weekly",
            "Predictive forecasting that updates continuously from live signals",
        ]),
        question(8, AutomationMaturity, "How are inbound leads routed to sales?", [
            "Manually assigned by a coordinator",
            "Simple round-robin or territory rules",
            "Rules-based routing using fit and intent data",
            "Real-time routing optimized by predicted conversion",
        ]),
        question(9, ContentOperations, "How is content performance measured?", [
            "Not measured beyond page views",
            "Channel-level engagement reports",
            "Asset-level performance tied to pipeline",
            "Automated insights that feed the next content brief",
        ]),
        question(10, Governance, "How are data privacy and consent managed?", [
            "Handled ad hoc by individual teams",
            "Documented policies with manual consent tracking",
            "Centralized consent management synced across systems",
            "Automated policy enforcement with audit trails",
        ]),
        question(11, DataSpineHealth, "How is customer identity resolved across systems?", [
            "Records are not matched across systems",
            "Manual matching when a report needs it",
            "Rule-based deduplication on key fields",
            "Automated identity graph maintained in real time",
        ]),
        question(12, FunnelIntelligence, "How do you measure conversion between funnel stages?", [
            "We only track closed deals",
            "Stage counts reported periodically",
            "Stage-to-stage conversion and velocity dashboards",
            "Cohort analysis with automated anomaly alerts",
        ]),
        question(13, AutomationMaturity, "How are marketing-to-sales handoffs managed?", [
            "Email or chat messages between teams",
            "CRM tasks created by hand",
            "Automated handoffs with agreed SLAs",
            "Closed-loop handoffs with automatic SLA escalation and feedback",
        ]),
        question(14, ContentOperations, "How do you personalize content for different audiences?", [
            "One version of content for everyone",
            "Basic segmentation by persona or industry",
            "Dynamic content driven by CRM attributes",
            "Individualized content assembled from modular components",
        ]),
        question(15, Governance, "How prepared are your teams to adopt new AI tools?", [
            "Little awareness or training",
            "Occasional workshops for interested staff",
            "Structured enablement program for key roles",
            "Ongoing change management with champions in every team",
        ]),
        question(16, DataSpineHealth, "How is your CRM data model governed?", [
            "Anyone can add fields and objects",
            "Informal conventions maintained by an admin",
            "Documented schema with change requests",
            "Versioned schema with automated validation",
        ]),
        question(17, FunnelIntelligence, "How is marketing ROI reported to leadership?", [
            "Activity metrics only",
            "Spend and lead volume by channel",
            "Pipeline and revenue contribution by channel",
            "Incrementality and marginal ROI guiding budget allocation",
        ]),
        question(18, AutomationMaturity, "How are your automation workflows monitored?", [
            "Failures are noticed when someone complains",
            "Periodic manual audits",
            "Alerting on workflow errors",
            "Observability with automatic remediation",
        ]),
        question(19, ContentOperations, "How is generative AI used in content production?", [
            "Not used",
            "Individual experimentation without guidelines",
            "Approved tools with brand and review guidelines",
            "Integrated AI workflows with human review and performance feedback",
        ]),
        question(20, Governance, "Who owns AI initiatives in your organization?", [
            "No clear owner",
            "Individual teams pursue their own projects",
            "A cross-functional working group",
            "Executive sponsor with a funded roadmap",
        ]),
        question(21, DataSpineHealth, "How quickly can teams access trusted reporting data?", [
            "Days or weeks via manual requests",
            "Within a day from a shared report",
            "Self-service dashboards refreshed daily",
            "Real-time self-service on a governed semantic layer",
        ]),
        question(22, FunnelIntelligence, "How are lead scoring models maintained?", [
            "No lead scoring",
            "Static points-based scoring set once",
            "Scoring reviewed against conversion data each quarter",
            "Machine-learned scoring retrained automatically",
        ]),
        question(23, AutomationMaturity, "How much of your reporting is produced automatically?", [
            "Almost all reports are built by hand",
            "Some scheduled exports",
            "Most recurring reports are automated",
            "Automated reporting with narrative insights delivered to stakeholders",
        ]),
        question(24, ContentOperations, "How is your content library organized for reuse?", [
            "Files scattered across drives",
            "Shared folders with loose naming conventions",
            "A managed asset library with taxonomy",
            "Componentized content in a headless CMS with rich metadata",
        ]),
        question(25, Governance, "How do you measure the impact of AI initiatives?", [
            "Impact is not measured",
            "Anecdotal success stories",
            "Defined KPIs tracked per initiative",
            "Portfolio-level value tracking tied to business outcomes",
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_bank_passes_invariants() {
        let bank = QuestionBank::standard();
        assert_eq!(bank.len(), 25);
        assert!(QuestionBank::new(bank.questions().to_vec()).is_ok());
        assert!(bank.validate_standard_shape().is_ok());
        assert_eq!(bank.max_score(), 100);
    }

    #[test]
    fn test_every_pillar_has_five_questions() {
        let bank = QuestionBank::standard();
        for pillar in Pillar::ALL {
            assert_eq!(bank.question_count(pillar), 5, "{}", pillar);
            assert_eq!(bank.pillar_max_score(pillar), 20);
        }
        assert_eq!(bank.pillars(), Pillar::ALL.to_vec());
    }

    #[test]
    fn test_option_ids_follow_question_ids() {
        let bank = QuestionBank::standard();
        let q7 = bank.find(7).unwrap();
        let ids: Vec<&str> = q7.options.iter().map(|o| o.option_id.as_str()).collect();
        assert_eq!(ids, ["7A", "7B", "7C", "7D"]);
        let values: Vec<u32> = q7.options.iter().map(|o| o.value).collect();
        assert_eq!(values, [1, 2, 3, 4]);
    }

    #[test]
    fn test_answer_for_denormalizes() {
        let bank = QuestionBank::standard();
        let answer = bank.answer_for(2, "2C").unwrap();
        assert_eq!(answer.value, 3);
        assert_eq!(answer.pillar, Pillar::FunnelIntelligence);
        assert_eq!(answer.option_id, "2C");
    }

    #[test]
    fn test_answer_for_rejects_foreign_option() {
        let bank = QuestionBank::standard();
        assert!(matches!(bank.answer_for(2, "3C"), Err(Error::InvalidInput(_))));
        assert!(matches!(bank.answer_for(99, "99A"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_quick_bank_keeps_first_of_each_pillar() {
        let quick = QuestionBank::quick();
        let ids: Vec<u32> = quick.questions().iter().map(|q| q.id).collect();
        assert_eq!(ids, [1, 2, 3, 4, 5]);
        assert!(quick.validate_standard_shape().is_err());
    }

    #[test]
    fn test_new_rejects_duplicate_ids() {
        let mut questions = QuestionBank::quick().questions().to_vec();
        questions[1].id = 1;
        assert!(QuestionBank::new(questions).is_err());
    }

    #[test]
    fn test_new_rejects_value_gaps() {
        let mut questions = QuestionBank::quick().questions().to_vec();
        questions[0].options[3].value = 3;
        assert!(QuestionBank::new(questions).is_err());
    }

    #[test]
    fn test_new_rejects_wrong_option_count() {
        let mut questions = QuestionBank::quick().questions().to_vec();
        questions[0].options.pop();
        assert!(QuestionBank::new(questions).is_err());
    }
}
