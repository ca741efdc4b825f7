//! aiq-api - AI Quotient assessment service
//!
//! Serves the question bank, scores answer sets and forwards completed
//! assessments to HubSpot for the marketing site.

use std::net::SocketAddr;
use std::path::PathBuf;

use aiq_common::config::TomlConfig;
use aiq_common::{HubSpotClient, QuestionBank};
use aiq_api::{build_router, AppState};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

/// Command-line arguments for aiq-api
#[derive(Parser, Debug)]
#[command(name = "aiq-api")]
#[command(about = "AI Quotient assessment API")]
#[command(version)]
struct Args {
    /// Config file (TOML)
    #[arg(short, long, env = "AIQ_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind, overrides [server] host
    #[arg(long, env = "AIQ_API_HOST")]
    host: Option<String>,

    /// Port to listen on, overrides [server] port
    #[arg(short, long, env = "AIQ_API_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .init();

    info!(
        "Starting AI Quotient API (aiq-api) v{} [{}]",
        env!("CARGO_PKG_VERSION"),
        env!("AIQ_REVISION")
    );

    let bank = QuestionBank::standard();
    bank.validate_standard_shape()
        .context("Question bank failed validation")?;
    info!("Loaded question bank ({} questions)", bank.len());

    let hubspot = HubSpotClient::new(config.hubspot.clone()).context("Failed to build HubSpot client")?;
    if hubspot.is_configured() {
        info!("HubSpot submission enabled");
    } else {
        warn!("HubSpot portal/form ids not set, submissions will be skipped");
    }

    let app = build_router(AppState::new(bank, hubspot));

    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("aiq-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
