//! Error taxonomy
//!
//! Each pipeline stage has its own error type. They meet in [`Failure`],
//! which is the only thing the classifier inspects.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum upstream body size accepted by the transport (16 MB).
pub const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

/// Outbound request could not be completed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Upstream did not answer within {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Connection failed: {0}")]
    ConnectionRefused(String),

    #[error("Anti-bot challenge unsolved after {attempts} attempt(s)")]
    ChallengeUnsolved { attempts: u32 },

    #[error("Upstream is rate limiting requests")]
    RateLimited,

    #[error("Upstream refused access")]
    Forbidden,

    #[error("Response too large ({size} bytes, max {MAX_RESPONSE_SIZE})")]
    ResponseTooLarge { size: u64 },
}

impl TransportError {
    /// Build from a reqwest error, keeping the timeout/connect distinction.
    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error, budget_seconds: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                seconds: budget_seconds,
            }
        } else {
            Self::ConnectionRefused(err.to_string())
        }
    }
}

/// Caller input rejected before any network call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Invalid request: {0}")]
    Invalid(String),
}

/// Upstream answered but the content could not be normalized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Upstream content changed: {0}")]
    UpstreamChanged(String),

    /// The upstream API turned down the parameters we forwarded.
    #[error("Upstream rejected the request: {0}")]
    Rejected(String),
}

impl ParseError {
    pub fn changed(message: impl Into<String>) -> Self {
        Self::UpstreamChanged(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::UpstreamChanged(format!("invalid JSON: {err}"))
    }
}

/// Any failure produced while serving one request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Failure {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Stable, machine-readable error category returned to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    UpstreamBlocked,
    UpstreamChanged,
    Timeout,
    Invalid,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::UpstreamBlocked => "UpstreamBlocked",
            Self::UpstreamChanged => "UpstreamChanged",
            Self::Timeout => "Timeout",
            Self::Invalid => "Invalid",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error body serialized as `{ "error": <kind>, "message": <text> }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorKind,
    pub message: String,
}

impl ErrorBody {
    pub fn new(error: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
        }
    }
}
