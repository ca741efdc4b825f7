//! Common error types for the AI Quotient modules

use thiserror::Error;

/// Common result type for assessment operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the assessment modules
///
/// Nothing here is fatal to a respondent's session: validation and
/// out-of-step failures leave the session untouched so the caller can
/// re-prompt.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse failure for a config file that exists
    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not permitted in the session's current step
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Outbound HTTP failure (client construction)
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<validator::ValidationErrors> for Error {
    /// Field messages, sorted so the text is stable across runs
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        Error::InvalidInput(messages.join("; "))
    }
}
