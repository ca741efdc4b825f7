//! Interactive assessment runner
//!
//! Drives one [`AssessmentSession`] through a [`Prompter`] and any writer,
//! so the same loop serves a terminal, piped input and scripted tests.

use std::io::Write;

use aiq_common::model::COMPANY_SIZES;
use aiq_common::submission::PageContext;
use aiq_common::{AssessmentSession, AssessmentStep, HubSpotClient, SubmissionOutcome, UserInfo};
use anyhow::Result;
use tracing::{debug, info};

use crate::format::{CliFormatter, OPTION_KEYS};
use crate::prompt::Prompter;

/// Runner settings taken from the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Record a skipped submission instead of posting to HubSpot
    pub dry_run: bool,
    pub context: PageContext,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Reached the thank-you view
    Completed(SubmissionOutcome),
    /// Respondent quit or input ended first
    Quit,
}

/// A parsed line at the question prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Zero-based option index
    Answer(usize),
    Back,
    Restart,
    Quit,
}

impl Command {
    /// Parse a question-prompt line: `1-4`, `a-d`, `p`, `r` or `q`
    pub fn parse(line: &str, option_count: usize) -> Option<Self> {
        let line = line.trim().to_ascii_lowercase();
        match line.as_str() {
            "p" | "prev" | "back" => return Some(Command::Back),
            "r" | "restart" => return Some(Command::Restart),
            "q" | "quit" => return Some(Command::Quit),
            _ => {}
        }

        let index = match line.parse::<usize>() {
            Ok(n) if n >= 1 => Some(n - 1),
            Ok(_) => None,
            Err(_) => {
                let mut chars = line.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => OPTION_KEYS.iter().position(|k| *k == c),
                    _ => None,
                }
            }
        }?;

        (index < option_count).then_some(Command::Answer(index))
    }
}

/// Company size menu entry that leaves the field blank
const SKIP_COMPANY_SIZE: &str = "Prefer not to say";

/// Results view actions, in menu order
const RESULT_ACTIONS: [&str; 4] = ["Submit results", "Previous question", "Start over", "Quit"];

/// Terminal front end for one respondent
///
/// Views are written to `output`; answers come from the [`Prompter`].
pub struct Runner<P, W> {
    prompter: P,
    output: W,
    session: AssessmentSession,
    client: HubSpotClient,
    options: RunOptions,
    /// Details typed so far, kept across failed validation
    draft: UserInfo,
}

impl<P: Prompter, W: Write> Runner<P, W> {
    pub fn new(
        prompter: P,
        output: W,
        session: AssessmentSession,
        client: HubSpotClient,
        options: RunOptions,
    ) -> Self {
        Self {
            prompter,
            output,
            session,
            client,
            options,
            draft: UserInfo::default(),
        }
    }

    pub fn session(&self) -> &AssessmentSession {
        &self.session
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the thank-you view or until the respondent quits
    pub async fn run(&mut self) -> Result<RunOutcome> {
        let banner = CliFormatter::format_banner(self.session.bank().len());
        writeln!(self.output, "{}", banner)?;

        loop {
            let keep_going = match self.session.step() {
                AssessmentStep::UserInfo => self.collect_user_info()?,
                AssessmentStep::Questions => self.ask_question()?,
                AssessmentStep::Results => self.review_results()?,
                AssessmentStep::Submit => {
                    self.submit().await?;
                    true
                }
                AssessmentStep::ThankYou => {
                    if let Some(outcome) = self.thank_you()? {
                        return Ok(RunOutcome::Completed(outcome));
                    }
                    true
                }
            };

            if !keep_going {
                info!(session_id = %self.session.id(), step = %self.session.step(), "Assessment abandoned");
                return Ok(RunOutcome::Quit);
            }
        }
    }

    /// Flush pending view text, then ask
    fn input(&mut self, prompt: &str, initial: &str) -> Result<Option<String>> {
        self.output.flush()?;
        self.prompter.input(prompt, initial)
    }

    fn collect_user_info(&mut self) -> Result<bool> {
        if let Some(existing) = self.session.user_info() {
            self.draft = existing.clone();
        }

        writeln!(self.output, "Tell us about yourself (company is required).")?;

        let mut draft = self.draft.clone();
        let fields: [(&str, &mut String); 4] = [
            ("First name", &mut draft.first_name),
            ("Last name", &mut draft.last_name),
            ("Email", &mut draft.email),
            ("Company", &mut draft.company),
        ];
        for (label, value) in fields {
            match self.input(label, value)? {
                Some(line) => *value = line,
                None => return Ok(false),
            }
        }

        match self.select_company_size(&draft.company_size)? {
            Some(size) => draft.company_size = size,
            None => return Ok(false),
        }

        match self.input("Job title", &draft.job_title)? {
            Some(line) => draft.job_title = line,
            None => return Ok(false),
        }

        self.draft = draft.clone();
        if let Err(e) = self.session.submit_user_info(draft) {
            writeln!(self.output, "\n{}\n", e)?;
        }
        Ok(true)
    }

    fn select_company_size(&mut self, current: &str) -> Result<Option<String>> {
        let mut items: Vec<&str> = COMPANY_SIZES.to_vec();
        items.push(SKIP_COMPANY_SIZE);
        let default = COMPANY_SIZES
            .iter()
            .position(|size| *size == current)
            .unwrap_or(COMPANY_SIZES.len());

        self.output.flush()?;
        let choice = self.prompter.select("Company size", &items, default)?;
        Ok(choice.map(|index| COMPANY_SIZES.get(index).map(|size| size.to_string()).unwrap_or_default()))
    }

    fn ask_question(&mut self) -> Result<bool> {
        let Some(question) = self.session.current_question().cloned() else {
            return Ok(true);
        };

        let selected = self
            .session
            .answer_for(question.id)
            .map(|a| a.option_id.clone());
        let view = CliFormatter::format_question(
            &question,
            self.session.current_index(),
            self.session.bank().len(),
            self.session.progress(),
            self.session.pillar_progress(),
            selected.as_deref(),
        );
        write!(self.output, "{}", view)?;

        loop {
            let Some(line) = self.input("Your answer", "")? else {
                return Ok(false);
            };

            match Command::parse(&line, question.options.len()) {
                Some(Command::Answer(index)) => {
                    let option_id = question.options[index].option_id.clone();
                    self.session.answer_current(&option_id)?;
                    debug!(question_id = question.id, option_id = %option_id, "Answered");
                    return Ok(true);
                }
                Some(Command::Back) => {
                    self.session.previous();
                    return Ok(true);
                }
                Some(Command::Restart) => {
                    self.restart()?;
                    return Ok(true);
                }
                Some(Command::Quit) => return Ok(false),
                None => writeln!(
                    self.output,
                    "Enter 1-4 or a-d, 'p' to go back, 'r' to restart, 'q' to quit."
                )?,
            }
        }
    }

    fn review_results(&mut self) -> Result<bool> {
        let view = CliFormatter::format_result(&self.session.result());
        writeln!(self.output, "{}", view)?;
        self.output.flush()?;

        let Some(action) = self.prompter.select("What next?", &RESULT_ACTIONS, 0)? else {
            return Ok(false);
        };

        match action {
            0 => {
                if let Err(e) = self.session.request_submission() {
                    writeln!(self.output, "{}", e)?;
                }
                Ok(true)
            }
            1 => {
                self.session.previous();
                Ok(true)
            }
            2 => {
                self.restart()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn submit(&mut self) -> Result<()> {
        if self.options.dry_run {
            writeln!(self.output, "\nDry run: results not sent.")?;
            self.session.record_submission(SubmissionOutcome::Skipped {
                reason: "dry run".to_string(),
            })?;
            return Ok(());
        }

        writeln!(self.output, "\nSubmitting your results...")?;
        self.output.flush()?;
        self.session
            .submit(&self.client, self.options.context.clone())
            .await?;
        Ok(())
    }

    /// Thank-you view; `None` when the respondent goes back to retry
    fn thank_you(&mut self) -> Result<Option<SubmissionOutcome>> {
        let outcome = self.session.submission().cloned();
        let view = CliFormatter::format_thank_you(outcome.as_ref());
        write!(self.output, "{}", view)?;

        let outcome = outcome.unwrap_or(SubmissionOutcome::Skipped {
            reason: "not submitted".to_string(),
        });

        let retryable = matches!(
            outcome,
            SubmissionOutcome::Rejected { .. } | SubmissionOutcome::Failed { .. }
        );
        if retryable {
            self.output.flush()?;
            if self.prompter.confirm("Try submitting again?", false)? == Some(true) {
                self.session.previous();
                return Ok(None);
            }
        }

        Ok(Some(outcome))
    }

    fn restart(&mut self) -> Result<()> {
        self.session.reset();
        self.draft = UserInfo::default();
        writeln!(self.output, "\nStarting over.\n")?;
        Ok(())
    }
}
