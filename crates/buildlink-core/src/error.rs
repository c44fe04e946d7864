//! Error types shared by all telemetry sources.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type for telemetry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures while turning upstream data into domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Path has no hierarchy separator or an empty room specification.
    #[error("Invalid source path: {0}")]
    InvalidPath(String),

    /// Timestamp does not match the upstream wire format.
    #[error("Invalid timestamp '{value}': {reason}")]
    Timestamp { value: String, reason: String },

    /// A telemetry value could not be parsed.
    #[error("Invalid value '{value}' for key '{key}'")]
    Value { key: String, value: String },
}

/// Telemetry error types.
///
/// Cloneable so that one failed upstream call can be handed to every caller
/// that was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Network, DNS or timeout failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream answered with a non-2xx status.
    #[error("Upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// Upstream data could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Malformed JSON payload.
    #[error("JSON decode error: {0}")]
    Json(String),

    /// Login did not yield a usable token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Start of a time range lies after its end.
    #[error("Invalid time range: start {start} is after end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Transport(_) => "TRANSPORT_ERROR",
            Error::UpstreamStatus { .. } => "UPSTREAM_STATUS",
            Error::Decode(DecodeError::InvalidPath(_)) => "INVALID_PATH",
            Error::Decode(DecodeError::Timestamp { .. }) => "INVALID_TIMESTAMP",
            Error::Decode(DecodeError::Value { .. }) => "INVALID_VALUE",
            Error::Json(_) => "JSON_DECODE_ERROR",
            Error::Auth(_) => "AUTH_FAILED",
            Error::InvalidRange { .. } => "INVALID_RANGE",
            Error::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether the failure originates from an upstream source rather than the caller.
    pub fn is_upstream(&self) -> bool {
        !matches!(self, Error::InvalidRange { .. } | Error::Config(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(format!("TOML parse error: {}", e))
    }
}
