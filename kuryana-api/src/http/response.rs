// Outcome envelope to HTTP response

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use kuryana_core::OutcomeEnvelope;

/// Wraps the dispatcher's envelope so handlers can return it directly.
#[derive(Debug)]
pub struct ApiResponse(pub OutcomeEnvelope);

impl From<OutcomeEnvelope> for ApiResponse {
    fn from(envelope: OutcomeEnvelope) -> Self {
        Self(envelope)
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let OutcomeEnvelope { status, body } = self.0;
        (status, Json(body)).into_response()
    }
}
