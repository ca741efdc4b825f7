//! Respondent input
//!
//! The runner asks for input through [`Prompter`]. On a terminal that is
//! [`TerminalPrompter`] (dialoguer widgets); piped input and tests use
//! [`ScriptedPrompter`], which reads one answer per line.

use std::io::BufRead;

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

/// Source of respondent input
///
/// Every method returns `None` when input has ended.
pub trait Prompter {
    /// Free text; an empty answer keeps `initial`
    fn input(&mut self, prompt: &str, initial: &str) -> Result<Option<String>>;

    /// Index into `items`
    fn select(&mut self, prompt: &str, items: &[&str], default: usize) -> Result<Option<usize>>;

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<Option<bool>>;
}

/// Interactive prompts on the controlling terminal
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, prompt: &str, initial: &str) -> Result<Option<String>> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if !initial.is_empty() {
            input = input.default(initial.to_string());
        }

        let line = input.interact_text()?;
        Ok(Some(line.trim().to_string()))
    }

    fn select(&mut self, prompt: &str, items: &[&str], default: usize) -> Result<Option<usize>> {
        // Esc or q dismisses the menu
        let choice = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact_opt()?;
        Ok(choice)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<Option<bool>> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact_opt()?;
        Ok(answer)
    }
}

/// Line-per-answer prompts over any reader
///
/// Selections accept the 1-based item number or the item text; confirms
/// accept y/yes/n/no. Lines that fit neither are skipped. Prompts are kept
/// in [`ScriptedPrompter::prompts`] so a run can be inspected afterwards.
pub struct ScriptedPrompter<R> {
    input: R,
    prompts: Vec<String>,
}

impl<R: BufRead> ScriptedPrompter<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far, with the current value in brackets when set
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    fn next_line(&mut self, prompt: String) -> Result<Option<String>> {
        self.prompts.push(prompt);
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead> Prompter for ScriptedPrompter<R> {
    fn input(&mut self, prompt: &str, initial: &str) -> Result<Option<String>> {
        let shown = if initial.is_empty() {
            prompt.to_string()
        } else {
            format!("{} [{}]", prompt, initial)
        };

        Ok(self.next_line(shown)?.map(|line| {
            if line.is_empty() {
                initial.to_string()
            } else {
                line
            }
        }))
    }

    fn select(&mut self, prompt: &str, items: &[&str], default: usize) -> Result<Option<usize>> {
        loop {
            let Some(line) = self.next_line(prompt.to_string())? else {
                return Ok(None);
            };
            if line.is_empty() {
                return Ok(Some(default));
            }

            let by_number = line
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .filter(|i| *i < items.len());
            let by_text = items.iter().position(|item| *item == line);

            if let Some(index) = by_number.or(by_text) {
                return Ok(Some(index));
            }
        }
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<Option<bool>> {
        loop {
            let Some(line) = self.next_line(prompt.to_string())? else {
                return Ok(None);
            };
            match line.to_ascii_lowercase().as_str() {
                "" => return Ok(Some(default)),
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => {}
            }
        }
    }
}
