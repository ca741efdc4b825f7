//! # AI Quotient Common Library
//!
//! Shared code for the AI Quotient assessment modules including:
//! - Pillar, question, respondent and answer types
//! - The fixed question bank
//! - Scoring engine (pillar scores, overall percentage, readiness level)
//! - Assessment session state machine
//! - HubSpot form submission adapter
//! - Configuration loading

pub mod config;
pub mod error;
pub mod model;
pub mod questions;
pub mod scoring;
pub mod session;
pub mod submission;

pub use error::{Error, Result};
pub use model::{Answer, Pillar, Question, QuestionOption, UserInfo};
pub use questions::QuestionBank;
pub use scoring::{AssessmentResult, MaxScoreBasis, PillarScore, ReadinessLevel};
pub use session::{AssessmentSession, AssessmentStep};
pub use submission::{HubSpotClient, LeadFields, SubmissionOutcome, SubmissionPayload};
