//! HTTP API handlers for aiq-api

pub mod health;
pub mod questions;
pub mod score;
pub mod submit;

pub use health::health_routes;
pub use questions::{list_pillars, list_questions};
pub use score::{score_answers, AnswerChoice};
pub use submit::submit_assessment;
