//! aiq-cli - take the AI Quotient assessment in a terminal
//!
//! **Usage:**
//! ```bash
//! aiq-cli [--config <file>] [--quick] [--dry-run] [--page-uri <uri>] [--page-name <name>]
//! ```

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use aiq_cli::{Prompter, RunOptions, RunOutcome, Runner, ScriptedPrompter, TerminalPrompter};
use aiq_common::config::TomlConfig;
use aiq_common::submission::PageContext;
use aiq_common::{AssessmentSession, HubSpotClient, QuestionBank};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

/// AI Quotient terminal assessment
#[derive(Parser, Debug)]
#[command(name = "aiq-cli")]
#[command(about = "Take the AI Quotient assessment in the terminal")]
#[command(version)]
struct Args {
    /// Config file (TOML)
    #[arg(short, long, env = "AIQ_CONFIG")]
    config: Option<PathBuf>,

    /// Short form: one question per pillar
    #[arg(long)]
    quick: bool,

    /// Show results without sending them to HubSpot
    #[arg(long)]
    dry_run: bool,

    /// Page URI reported with the submission
    #[arg(long, value_name = "URI")]
    page_uri: Option<String>,

    /// Page name reported with the submission
    #[arg(long, value_name = "NAME")]
    page_name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Logs go to stderr so prompts on stdout stay readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with_writer(io::stderr)
        .init();

    let bank = if args.quick {
        QuestionBank::quick()
    } else {
        QuestionBank::standard()
    };

    let client = HubSpotClient::new(config.hubspot.clone()).context("Failed to build HubSpot client")?;
    if !args.dry_run && !client.is_configured() {
        warn!("HubSpot portal/form ids not set, results will not be sent");
    }

    let defaults = client.default_context();
    let options = RunOptions {
        dry_run: args.dry_run,
        context: PageContext::new(
            args.page_uri.unwrap_or(defaults.page_uri),
            args.page_name.unwrap_or(defaults.page_name),
        ),
    };

    let session = AssessmentSession::new(Arc::new(bank));
    let stdout = io::stdout();
    let outcome = if io::stdin().is_terminal() {
        run(TerminalPrompter::new(), stdout.lock(), session, client, options).await?
    } else {
        let stdin = io::stdin();
        run(ScriptedPrompter::new(stdin.lock()), stdout.lock(), session, client, options).await?
    };

    match outcome {
        RunOutcome::Completed(outcome) => {
            info!(success = outcome.is_success(), "Assessment finished");
        }
        RunOutcome::Quit => {
            info!("Assessment closed before completion");
        }
    }

    Ok(())
}

/// Widgets on a terminal, one answer per line when input is piped
async fn run<P: Prompter, W: Write>(
    prompter: P,
    output: W,
    session: AssessmentSession,
    client: HubSpotClient,
    options: RunOptions,
) -> Result<RunOutcome> {
    Runner::new(prompter, output, session, client, options).run().await
}
