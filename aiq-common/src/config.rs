//! Configuration loading and config file resolution
//!
//! Bootstrap configuration is a small TOML file. Every section is optional
//! and falls back to built-in defaults.
//!
//! # Config File Priority
//!
//! 1. Command-line argument (highest priority)
//! 2. `AIQ_CONFIG` environment variable
//! 3. User config directory (`~/.config/aiq/config.toml` on Linux)
//! 4. `/etc/aiq/config.toml` (Linux only)
//! 5. Built-in defaults (lowest priority)
//!
//! A missing file is never fatal: a warning is logged and defaults are used.
//! A file that exists but does not parse is an error.
//!
//! After the file is loaded, `AIQ_HUBSPOT_PORTAL_ID`, `AIQ_HUBSPOT_FORM_ID`
//! and `AIQ_HUBSPOT_ENDPOINT` override the matching `[hubspot]` keys.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::{Error, Result};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "AIQ_CONFIG";

pub const PORTAL_ID_ENV_VAR: &str = "AIQ_HUBSPOT_PORTAL_ID";
pub const FORM_ID_ENV_VAR: &str = "AIQ_HUBSPOT_FORM_ID";
pub const ENDPOINT_ENV_VAR: &str = "AIQ_HUBSPOT_ENDPOINT";

/// HubSpot forms submission endpoint (portal and form ids are appended)
pub const DEFAULT_HUBSPOT_ENDPOINT: &str =
    "https://api.hsforms.com/submissions/v3/integration/submit";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub hubspot: HubSpotConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Lead submission target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubSpotConfig {
    pub portal_id: String,
    pub form_id: String,

    /// Base URL; `/{portal_id}/{form_id}` is appended
    pub endpoint: String,

    /// Client-side timeout before a submission counts as failed
    pub timeout_secs: u64,

    /// Page context sent with every submission unless the caller overrides it
    pub page_uri: String,
    pub page_name: String,

    /// Also send one `ai_quotient_q<id>` field per answer
    pub include_answers: bool,
}

impl Default for HubSpotConfig {
    fn default() -> Self {
        Self {
            portal_id: String::new(),
            form_id: String::new(),
            endpoint: DEFAULT_HUBSPOT_ENDPOINT.to_string(),
            timeout_secs: 10,
            page_uri: String::new(),
            page_name: "AI Quotient Assessment".to_string(),
            include_answers: false,
        }
    }
}

impl HubSpotConfig {
    /// Both portal and form ids are set
    pub fn is_configured(&self) -> bool {
        !self.portal_id.trim().is_empty() && !self.form_id.trim().is_empty()
    }

    /// Reject settings that would make every submission fail
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "hubspot.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full submission URL, or `None` while ids are missing
    pub fn submission_url(&self) -> Option<String> {
        if !self.is_configured() {
            return None;
        }
        Some(format!(
            "{}/{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.portal_id.trim(),
            self.form_id.trim()
        ))
    }
}

/// HTTP listener settings for aiq-api
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5780,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); RUST_LOG wins when set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a config file that must exist
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Resolve, load and apply environment overrides
    pub fn load(cli_arg: Option<&Path>) -> Result<Self> {
        let mut config = match resolve_config_path(cli_arg) {
            Some(path) if path.is_file() => {
                let config = Self::load_file(&path).map_err(|e| {
                    Error::Config(format!("Failed to load {}: {}", path.display(), e))
                })?;
                info!("Loaded configuration from {}", path.display());
                config
            }
            Some(path) => {
                warn!(
                    "Config file {} not found, using built-in defaults",
                    path.display()
                );
                Self::default()
            }
            None => {
                info!("No config file found, using built-in defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.hubspot.validate()?;
        Ok(config)
    }

    /// Apply `AIQ_HUBSPOT_*` environment variables over file values
    pub fn apply_env_overrides(&mut self) {
        if let Some(portal_id) = non_empty_env(PORTAL_ID_ENV_VAR) {
            self.hubspot.portal_id = portal_id;
        }
        if let Some(form_id) = non_empty_env(FORM_ID_ENV_VAR) {
            self.hubspot.form_id = form_id;
        }
        if let Some(endpoint) = non_empty_env(ENDPOINT_ENV_VAR) {
            self.hubspot.endpoint = endpoint;
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Pick the config file path by priority
///
/// Explicit choices (CLI, environment) are returned even when the file does
/// not exist so the caller can warn about them. Default locations are only
/// returned when present.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Some(path) = non_empty_env(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }

    default_config_locations().into_iter().find(|p| p.is_file())
}

/// Platform config file locations, most specific first
pub fn default_config_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("aiq").join("config.toml"));
    }

    if cfg!(target_os = "linux") {
        locations.push(PathBuf::from("/etc/aiq/config.toml"));
    }

    locations
}
