//! Failure Classifier
//!
//! The single place where pipeline outcomes become outward status codes.

use http::StatusCode;
use serde::Serialize;

use crate::error::{ErrorBody, ErrorKind, Failure, ParseError, ResolveError, TransportError};
use crate::record::CanonicalRecord;

/// Response body: the record on success, an [`ErrorBody`] otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutcomeBody {
    Record(CanonicalRecord),
    Error(ErrorBody),
}

/// The only value handed back to the route layer.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeEnvelope {
    pub status: StatusCode,
    pub body: OutcomeBody,
}

impl OutcomeEnvelope {
    #[must_use]
    pub fn ok(record: CanonicalRecord) -> Self {
        Self {
            status: StatusCode::OK,
            body: OutcomeBody::Record(record),
        }
    }

    pub fn error(status: StatusCode, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status,
            body: OutcomeBody::Error(ErrorBody::new(kind, message)),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Error category, if this envelope carries an error.
    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match &self.body {
            OutcomeBody::Error(body) => Some(body.error),
            OutcomeBody::Record(_) => None,
        }
    }
}

/// Map a pipeline outcome onto its outward envelope.
///
/// `upstream_status` is the status of the upstream response, when one was
/// received. An upstream 404 wins over whatever the normalizer concluded.
pub fn classify(
    upstream_status: Option<u16>,
    outcome: Result<CanonicalRecord, Failure>,
) -> OutcomeEnvelope {
    let failure = match outcome {
        Err(Failure::Transport(err)) => return transport_failure(&err),
        _ if upstream_status == Some(404) => {
            tracing::debug!("Upstream answered 404");
            return OutcomeEnvelope::error(
                StatusCode::NOT_FOUND,
                ErrorKind::NotFound,
                "Resource not found on upstream",
            );
        }
        Ok(record) => return OutcomeEnvelope::ok(record),
        Err(failure) => failure,
    };

    match failure {
        Failure::Parse(ParseError::NotFound(message)) => {
            tracing::debug!("Resource not found: {}", message);
            OutcomeEnvelope::error(StatusCode::NOT_FOUND, ErrorKind::NotFound, message)
        }
        Failure::Parse(ParseError::UpstreamChanged(message)) => {
            tracing::warn!("Upstream content changed: {}", message);
            OutcomeEnvelope::error(StatusCode::BAD_GATEWAY, ErrorKind::UpstreamChanged, message)
        }
        Failure::Parse(ParseError::Rejected(message)) => {
            tracing::debug!("Upstream rejected request: {}", message);
            OutcomeEnvelope::error(StatusCode::BAD_REQUEST, ErrorKind::Invalid, message)
        }
        Failure::Resolve(ResolveError::Invalid(message)) => {
            tracing::debug!("Invalid request: {}", message);
            OutcomeEnvelope::error(StatusCode::BAD_REQUEST, ErrorKind::Invalid, message)
        }
        Failure::Transport(err) => transport_failure(&err),
    }
}

fn transport_failure(err: &TransportError) -> OutcomeEnvelope {
    tracing::warn!("Upstream transport failed: {}", err);
    let (status, kind) = match err {
        TransportError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, ErrorKind::Timeout),
        TransportError::ResponseTooLarge { .. } => {
            (StatusCode::BAD_GATEWAY, ErrorKind::UpstreamChanged)
        }
        TransportError::ConnectionRefused(_)
        | TransportError::ChallengeUnsolved { .. }
        | TransportError::RateLimited
        | TransportError::Forbidden => {
            (StatusCode::SERVICE_UNAVAILABLE, ErrorKind::UpstreamBlocked)
        }
    };
    OutcomeEnvelope::error(status, kind, err.to_string())
}
