//! Assessment data model
//!
//! Pillars, questions, respondent details and answers. Derived score types
//! live in [`crate::scoring`].

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use validator::{validate_email, Validate, ValidationError};

use crate::Result;

/// Company size choices offered by front ends
pub const COMPANY_SIZES: [&str; 6] = ["1-10", "11-50", "51-200", "201-500", "501-1000", "1000+"];

/// One of the five maturity categories the assessment measures
///
/// Serialized as the display label so JSON stays readable for the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pillar {
    #[serde(rename = "Data Spine Health")]
    DataSpineHealth,

    #[serde(rename = "Funnel Intelligence & Attribution")]
    FunnelIntelligence,

    #[serde(rename = "Automation Maturity")]
    AutomationMaturity,

    #[serde(rename = "AI-Ready Content Operations")]
    ContentOperations,

    #[serde(rename = "Governance & Change Management")]
    Governance,
}

impl Pillar {
    /// All pillars in presentation order
    pub const ALL: [Pillar; 5] = [
        Pillar::DataSpineHealth,
        Pillar::FunnelIntelligence,
        Pillar::AutomationMaturity,
        Pillar::ContentOperations,
        Pillar::Governance,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Pillar::DataSpineHealth => "Data Spine Health",
            Pillar::FunnelIntelligence => "Funnel Intelligence & Attribution",
            Pillar::AutomationMaturity => "Automation Maturity",
            Pillar::ContentOperations => "AI-Ready Content Operations",
            Pillar::Governance => "Governance & Change Management",
        }
    }

    /// Parse a display label (case-insensitive, surrounding whitespace ignored)
    pub fn from_label(label: &str) -> Option<Pillar> {
        let wanted = label.trim();
        Pillar::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(wanted))
    }

    /// CRM property slug for this pillar
    ///
    /// Lower-cased, `&` spelled out as `and`, every run of other
    /// non-alphanumerics collapsed to a single underscore:
    /// "Funnel Intelligence & Attribution" → "funnel_intelligence_and_attribution"
    pub fn field_slug(&self) -> String {
        slugify(self.label())
    }

    /// CRM property name holding this pillar's percentage
    pub fn score_field(&self) -> String {
        format!("{}_score", self.field_slug())
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn slugify(label: &str) -> String {
    let spelled = label.to_lowercase().replace('&', " and ");
    let mut slug = String::with_capacity(spelled.len());
    let mut pending_sep = false;

    for c in spelled.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }

    slug
}

/// One selectable answer to a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    /// Unique option identifier, e.g. "1A"
    pub option_id: String,
    pub text: String,
    /// Ordinal maturity score, 1 (lowest) to 4 (highest)
    pub value: u32,
}

/// A question in the bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Stable ordering key
    pub id: u32,
    pub text: String,
    pub pillar: Pillar,
    pub options: Vec<QuestionOption>,
}

impl Question {
    /// Look up one of this question's options by id
    pub fn option(&self, option_id: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.option_id == option_id)
    }
}

/// Respondent details captured at the start of the flow
///
/// Only `company` is required. Optional fields default to empty strings so
/// the CRM payload always carries every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UserInfo {
    pub first_name: String,
    pub last_name: String,
    #[validate(custom = "validate_optional_email")]
    pub email: String,
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company: String,
    pub company_size: String,
    pub job_title: String,
}

impl UserInfo {
    /// Convenience constructor for the required-ish contact fields
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            company: company.into(),
            ..Self::default()
        }
    }

    /// Copy with every field trimmed
    pub fn normalized(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            company: self.company.trim().to_string(),
            company_size: self.company_size.trim().to_string(),
            job_title: self.job_title.trim().to_string(),
        }
    }

    /// Check field rules on the trimmed values
    pub fn validate(&self) -> Result<()> {
        Validate::validate(&self.normalized())?;
        Ok(())
    }
}

/// Email may be left blank; when given it must be a valid address
fn validate_optional_email(email: &str) -> std::result::Result<(), ValidationError> {
    if email.is_empty() || validate_email(email) {
        return Ok(());
    }

    let mut error = ValidationError::new("email");
    error.message = Some(Cow::Owned(format!("Invalid email address: {}", email)));
    Err(error)
}

/// A respondent's choice for one question
///
/// `value` and `pillar` are denormalized from the bank; build answers with
/// [`crate::QuestionBank::answer_for`] so they cannot disagree with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: u32,
    pub option_id: String,
    pub value: u32,
    pub pillar: Pillar,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_field_slugs() {
        assert_eq!(Pillar::DataSpineHealth.field_slug(), "data_spine_health");
        assert_eq!(
            Pillar::FunnelIntelligence.field_slug(),
            "funnel_intelligence_and_attribution"
        );
        assert_eq!(Pillar::AutomationMaturity.field_slug(), "automation_maturity");
        assert_eq!(
            Pillar::ContentOperations.field_slug(),
            "ai_ready_content_operations"
        );
        assert_eq!(
            Pillar::Governance.score_field(),
            "governance_and_change_management_score"
        );
    }

    #[test]
    fn test_pillar_serializes_as_label() {
        let json = serde_json::to_string(&Pillar::FunnelIntelligence).unwrap();
        assert_eq!(json, "\"Funnel Intelligence & Attribution\"");

        let parsed: Pillar = serde_json::from_str("\"AI-Ready Content Operations\"").unwrap();
        assert_eq!(parsed, Pillar::ContentOperations);
    }

    #[test]
    fn test_from_label() {
        assert_eq!(
            Pillar::from_label("  automation maturity "),
            Some(Pillar::AutomationMaturity)
        );
        assert_eq!(Pillar::from_label("Sales Enablement"), None);
    }

    #[test]
    fn test_user_info_requires_company() {
        let info = UserInfo::new("Jane", "Doe", "jane@x.com", "   ");
        assert!(matches!(info.validate(), Err(Error::InvalidInput(_))));

        let info = UserInfo::new("", "", "", "Acme");
        assert!(info.validate().is_ok());
    }

    #[test]
    fn test_user_info_rejects_malformed_email() {
        for email in [
            "jane",
            "@x.com",
            "jane@",
            "jane@x@y",
            "ja ne@x.com",
            "jane@x.",
            "jane@.",
            "<x>@y",
            "jane@x,com",
        ] {
            let info = UserInfo::new("Jane", "Doe", email, "Acme");
            match info.validate() {
                Err(Error::InvalidInput(msg)) => assert!(msg.contains("Invalid email address"), "{}", msg),
                other => panic!("{} should be rejected, got {:?}", email, other),
            }
        }
    }

    #[test]
    fn test_user_info_accepts_valid_or_blank_email() {
        for email in ["jane@acme.com", " jane.doe+aiq@sub.acme.io ", ""] {
            let info = UserInfo::new("Jane", "Doe", email, "Acme");
            assert!(info.validate().is_ok(), "{:?} should be accepted", email);
        }
    }

    #[test]
    fn test_user_info_reports_every_failure() {
        let info = UserInfo::new("Jane", "Doe", "jane@x,com", "  ");
        let Err(Error::InvalidInput(msg)) = info.validate() else {
            panic!("expected invalid input");
        };
        assert!(msg.contains("Company name is required"));
        assert!(msg.contains("Invalid email address: jane@x,com"));
    }

    #[test]
    fn test_normalized_trims_everything() {
        let info = UserInfo {
            first_name: " Jane ".to_string(),
            company: "\tAcme\n".to_string(),
            job_title: "  ".to_string(),
            ..UserInfo::default()
        }
        .normalized();

        assert_eq!(info.first_name, "Jane");
        assert_eq!(info.company, "Acme");
        assert_eq!(info.job_title, "");
        assert_eq!(info.email, "");
    }

    #[test]
    fn test_user_info_missing_fields_deserialize_empty() {
        let info: UserInfo = serde_json::from_str(r#"{"company":"Acme","firstName":"Jane"}"#).unwrap();
        assert_eq!(info.company, "Acme");
        assert_eq!(info.first_name, "Jane");
        assert_eq!(info.company_size, "");
    }
}
