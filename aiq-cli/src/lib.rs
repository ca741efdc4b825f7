//! aiq-cli library - terminal front end for the AI Quotient assessment
//!
//! The process is the session: one respondent is walked from their details
//! through the questions to the results and the optional CRM submission.

pub mod format;
pub mod prompt;
pub mod runner;

pub use format::CliFormatter;
pub use prompt::{Prompter, ScriptedPrompter, TerminalPrompter};
pub use runner::{Command, RunOptions, RunOutcome, Runner};
