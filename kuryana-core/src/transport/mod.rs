//! Transport Client
//!
//! Outbound access to the upstream site. [`Transport`] is the seam the
//! dispatcher depends on; [`HttpTransport`] is the production implementation
//! with challenge negotiation and a process-wide cookie session.

mod challenge;
mod client;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::TransportError;
use crate::resolver::UpstreamRequest;

pub use challenge::CHALLENGE_ATTEMPTS;
pub use client::{HttpTransport, Session};

/// How the upstream encoded the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Markup,
    JsonApi,
}

impl ContentType {
    /// Classify a `Content-Type` header value; anything non-JSON is markup.
    #[must_use]
    pub fn from_header(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.to_ascii_lowercase().contains("json") => Self::JsonApi,
            _ => Self::Markup,
        }
    }
}

/// Upstream answer as received. Never mutated after the transport returns it.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub http_status: u16,
    pub content_type: ContentType,
    pub body: Bytes,
    pub final_url: String,
}

impl RawResponse {
    /// Body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Executes one upstream request.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<RawResponse, TransportError>;
}
