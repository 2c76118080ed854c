// ================================================================
// File: livebot-common/src/error.rs
// ================================================================

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not found error: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A third-party HTTP dependency failed (transport error or non-success status).
    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<chrono::format::ParseError> for Error {
    fn from(err: chrono::format::ParseError) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Platform(e.to_string())
    }
}

/// Failure talking to a third-party API.
///
/// `status` is `None` when the request never produced a response (DNS, TLS,
/// connection reset...). Body decode failures are *not* API errors; those are
/// reported as [`Error::Json`] and treated as internal bugs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub url: String,
    pub status: Option<u16>,
    pub message: Option<String>,
}

impl ApiError {
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status: Some(status),
            message: None,
        }
    }

    pub fn transport(url: impl Into<String>, err: impl fmt::Display) -> Self {
        Self {
            url: url.into(),
            status: None,
            message: Some(err.to_string()),
        }
    }

    pub fn is_status(&self, code: u16) -> bool {
        self.status == Some(code)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string());
        match &self.message {
            Some(msg) => write!(f, "API error: {} (status: {}): {}", self.url, status, msg),
            None => write!(f, "API error: {} (status: {})", self.url, status),
        }
    }
}

impl std::error::Error for ApiError {}

/// What a command handler can fail with. The dispatcher decides what (if
/// anything) the chat gets to see based on the variant.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("upstream failure: {0}")]
    Upstream(ApiError),

    #[error("internal failure: {0}")]
    Internal(Error),
}

impl From<Error> for CommandError {
    fn from(err: Error) -> Self {
        match err {
            Error::Api(api) => CommandError::Upstream(api),
            other => CommandError::Internal(other),
        }
    }
}

impl From<ApiError> for CommandError {
    fn from(err: ApiError) -> Self {
        CommandError::Upstream(err)
    }
}
