//! HubSpot lead submission adapter
//!
//! Turns respondent details and an [`AssessmentResult`] into the forms API
//! payload and posts it once. Lead capture is best-effort: [`HubSpotClient::submit`]
//! never returns an error, it reports a [`SubmissionOutcome`] and logs failures.
//!
//! Endpoint: `POST {endpoint}/{portal_id}/{form_id}` with
//! `{"fields": [{"name", "value"}], "context": {"pageUri", "pageName"}}`.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::HubSpotConfig;
use crate::model::{Answer, Pillar, UserInfo};
use crate::scoring::{AssessmentResult, ReadinessLevel};
use crate::{Error, Result};

const USER_AGENT: &str = concat!("aiq/", env!("CARGO_PKG_VERSION"));

/// One `{name, value}` pair in the forms payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FormField {
    fn new(name: impl Into<String>, value: impl ToString) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
        }
    }
}

/// Page the respondent submitted from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    pub page_uri: String,
    pub page_name: String,
}

impl PageContext {
    pub fn new(page_uri: impl Into<String>, page_name: impl Into<String>) -> Self {
        Self {
            page_uri: page_uri.into(),
            page_name: page_name.into(),
        }
    }
}

/// Request body for the forms submission endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub fields: Vec<FormField>,
    pub context: PageContext,
}

impl SubmissionPayload {
    pub fn new(lead: &LeadFields, context: PageContext) -> Self {
        Self {
            fields: lead.to_fields(),
            context,
        }
    }

    /// Value of a named field, if present
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// Every CRM property the assessment writes
///
/// Field names are spelled out once, in [`LeadFields::to_fields`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadFields {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub company: String,
    pub company_size: String,
    pub job_title: String,
    pub ai_quotient_score: u32,
    pub ai_readiness_level: ReadinessLevel,
    /// Percentage per pillar, sent as `<pillar slug>_score`
    pub pillar_scores: Vec<(Pillar, u32)>,
    /// `(question id, value)`, sent as `ai_quotient_q<id>`; empty unless requested
    pub answers: Vec<(u32, u32)>,
}

impl LeadFields {
    /// Map respondent and result; strings are trimmed, missing ones stay empty
    pub fn new(user_info: &UserInfo, result: &AssessmentResult) -> Self {
        let info = user_info.normalized();
        Self {
            firstname: info.first_name,
            lastname: info.last_name,
            email: info.email,
            company: info.company,
            company_size: info.company_size,
            job_title: info.job_title,
            ai_quotient_score: result.percentage,
            ai_readiness_level: result.readiness_level,
            pillar_scores: result
                .pillar_scores
                .iter()
                .map(|p| (p.pillar, p.percentage))
                .collect(),
            answers: Vec::new(),
        }
    }

    /// Attach per-question answer values
    pub fn with_answers(mut self, answers: &[Answer]) -> Self {
        let mut values: Vec<(u32, u32)> = answers.iter().map(|a| (a.question_id, a.value)).collect();
        values.sort_unstable_by_key(|(id, _)| *id);
        values.dedup_by_key(|(id, _)| *id);
        self.answers = values;
        self
    }

    /// Ordered `{name, value}` pairs, all values stringified
    pub fn to_fields(&self) -> Vec<FormField> {
        let mut fields = vec![
            FormField::new("firstname", &self.firstname),
            FormField::new("lastname", &self.lastname),
            FormField::new("email", &self.email),
            FormField::new("company", &self.company),
            FormField::new("company_size", &self.company_size),
            FormField::new("job_title", &self.job_title),
            FormField::new("ai_quotient_score", self.ai_quotient_score),
            FormField::new("ai_readiness_level", self.ai_readiness_level.label()),
        ];

        fields.extend(
            self.pillar_scores
                .iter()
                .map(|(pillar, percentage)| FormField::new(pillar.score_field(), percentage)),
        );

        fields.extend(
            self.answers
                .iter()
                .map(|(id, value)| FormField::new(format!("ai_quotient_q{}", id), value)),
        );

        fields
    }
}

/// What happened to a submission attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// Endpoint answered 2xx
    Accepted,
    /// Endpoint answered with another status
    Rejected { code: u16, message: String },
    /// Network error or timeout
    Failed { message: String },
    /// Not attempted (unconfigured target or dry run)
    Skipped { reason: String },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted)
    }
}

/// HubSpot forms API client
#[derive(Debug, Clone)]
pub struct HubSpotClient {
    http_client: reqwest::Client,
    config: HubSpotConfig,
}

impl HubSpotClient {
    pub fn new(config: HubSpotConfig) -> Result<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .connect_timeout(config.timeout().min(Duration::from_secs(5)))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &HubSpotConfig {
        &self.config
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Page context from configuration
    pub fn default_context(&self) -> PageContext {
        PageContext::new(&self.config.page_uri, &self.config.page_name)
    }

    /// Build the request body, honoring `include_answers`
    pub fn build_payload(
        &self,
        user_info: &UserInfo,
        result: &AssessmentResult,
        answers: &[Answer],
        context: PageContext,
    ) -> SubmissionPayload {
        let mut lead = LeadFields::new(user_info, result);
        if self.config.include_answers {
            lead = lead.with_answers(answers);
        }
        SubmissionPayload::new(&lead, context)
    }

    /// Post the payload once; failures are logged and reported, never raised
    pub async fn submit(&self, payload: &SubmissionPayload) -> SubmissionOutcome {
        let Some(url) = self.config.submission_url() else {
            warn!("HubSpot portal/form ids not configured, skipping lead submission");
            return SubmissionOutcome::Skipped {
                reason: "HubSpot portal and form ids are not configured".to_string(),
            };
        };

        debug!(
            url = %url,
            fields = payload.fields.len(),
            "Submitting assessment lead to HubSpot"
        );

        let response = match self.http_client.post(&url).json(payload).send().await {
            Ok(response) => response,
            Err(e) => {
                let message = if e.is_timeout() {
                    format!("Timed out after {}s", self.config.timeout_secs)
                } else {
                    e.to_string()
                };
                warn!(error = %message, "HubSpot submission failed");
                return SubmissionOutcome::Failed { message };
            }
        };

        let status = response.status();
        if status.is_success() {
            info!(status = status.as_u16(), "HubSpot submission accepted");
            return SubmissionOutcome::Accepted;
        }

        let message = response.text().await.unwrap_or_default();
        warn!(
            status = status.as_u16(),
            body = %message,
            "HubSpot submission rejected"
        );
        SubmissionOutcome::Rejected {
            code: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::QuestionBank;
    use crate::scoring;

    fn sample_result() -> AssessmentResult {
        let bank = QuestionBank::standard();
        let answers = vec![
            bank.answer_for(1, "1C").unwrap(),
            bank.answer_for(6, "6D").unwrap(),
            bank.answer_for(2, "2B").unwrap(),
        ];
        scoring::score(&bank, &answers)
    }

    #[test]
    fn test_payload_has_each_field_once() {
        let info = UserInfo::new("Jane", "Doe", "jane@x.com", "Acme");
        let lead = LeadFields::new(&info, &sample_result());
        let fields = lead.to_fields();

        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        for required in [
            "firstname",
            "lastname",
            "email",
            "company",
            "ai_quotient_score",
            "ai_readiness_level",
        ] {
            assert_eq!(
                names.iter().filter(|n| **n == required).count(),
                1,
                "{} should appear exactly once",
                required
            );
        }

        let pillar_fields: Vec<&&str> = names.iter().filter(|n| n.ends_with("_score") && **n != "ai_quotient_score").collect();
        assert_eq!(pillar_fields.len(), 5);

        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }

    #[test]
    fn test_optional_fields_are_empty_strings() {
        let info = UserInfo::new(" Jane ", "Doe", "jane@x.com", "Acme ");
        let payload = SubmissionPayload::new(
            &LeadFields::new(&info, &sample_result()),
            PageContext::default(),
        );

        assert_eq!(payload.field("firstname"), Some("Jane"));
        assert_eq!(payload.field("company"), Some("Acme"));
        assert_eq!(payload.field("company_size"), Some(""));
        assert_eq!(payload.field("job_title"), Some(""));
        assert_eq!(payload.field("ai_quotient_score"), Some("9"));
        assert_eq!(payload.field("ai_readiness_level"), Some("AI Developing"));
        assert_eq!(payload.field("data_spine_health_score"), Some("35"));
        assert_eq!(
            payload.field("funnel_intelligence_and_attribution_score"),
            Some("10")
        );
    }

    #[test]
    fn test_payload_json_shape() {
        let info = UserInfo::new("Jane", "Doe", "jane@x.com", "Acme");
        let payload = SubmissionPayload::new(
            &LeadFields::new(&info, &sample_result()),
            PageContext::new("https://example.com/ai-quotient", "AI Quotient"),
        );
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["fields"][0]["name"], "firstname");
        assert_eq!(json["fields"][0]["value"], "Jane");
        assert_eq!(json["context"]["pageUri"], "https://example.com/ai-quotient");
        assert_eq!(json["context"]["pageName"], "AI Quotient");
    }

    #[test]
    fn test_answers_only_when_requested() {
        let bank = QuestionBank::standard();
        let answers = vec![bank.answer_for(2, "2B").unwrap(), bank.answer_for(1, "1C").unwrap()];
        let info = UserInfo::new("Jane", "Doe", "jane@x.com", "Acme");
        let result = sample_result();

        let plain = LeadFields::new(&info, &result).to_fields();
        assert!(plain.iter().all(|f| !f.name.starts_with("ai_quotient_q")));

        let detailed = LeadFields::new(&info, &result).with_answers(&answers).to_fields();
        let answer_fields: Vec<(&str, &str)> = detailed
            .iter()
            .filter(|f| f.name.starts_with("ai_quotient_q"))
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect();
        assert_eq!(answer_fields, [("ai_quotient_q1", "3"), ("ai_quotient_q2", "2")]);
    }

    #[tokio::test]
    async fn test_unconfigured_client_skips() {
        let client = HubSpotClient::new(HubSpotConfig::default()).unwrap();
        let payload = SubmissionPayload {
            fields: Vec::new(),
            context: PageContext::default(),
        };

        let outcome = client.submit(&payload).await;
        assert!(matches!(outcome, SubmissionOutcome::Skipped { .. }));
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_client_rejects_zero_timeout() {
        let config = HubSpotConfig {
            portal_id: "12345".to_string(),
            form_id: "form-abc".to_string(),
            timeout_secs: 0,
            ..HubSpotConfig::default()
        };
        assert!(matches!(HubSpotClient::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_outcome_json() {
        let json = serde_json::to_value(SubmissionOutcome::Rejected {
            code: 400,
            message: "bad".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["code"], 400);
    }
}
