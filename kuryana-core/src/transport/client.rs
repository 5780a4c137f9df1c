//! Upstream HTTP client with challenge negotiation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

use super::challenge::{is_challenge, negotiation_backoff, CHALLENGE_ATTEMPTS};
use super::{ContentType, RawResponse, Transport};
use crate::config::UpstreamConfig;
use crate::error::{TransportError, MAX_RESPONSE_SIZE};
use crate::resolver::{HttpMethod, UpstreamRequest};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,application/json;q=0.8,*/*;q=0.7";
const ACCEPT_LANG: &str = "en-US,en;q=0.9";

/// Upstream session shared by every request in the process.
///
/// Holds the cookies the upstream hands out, challenge clearance included.
/// It starts empty and fills on first use; dropping it only costs another
/// negotiation.
#[derive(Debug, Default)]
pub struct Session {
    jar: Arc<Jar>,
    negotiated: AtomicBool,
}

impl Session {
    /// Whether a challenge negotiation has run at least once.
    #[must_use]
    pub fn negotiated(&self) -> bool {
        self.negotiated.load(Ordering::Relaxed)
    }
}

/// What a single attempt produced
enum Attempt {
    Content(RawResponse),
    Challenge,
}

/// Production [`Transport`]: one long-lived instance per process, built at
/// startup and injected into the dispatcher.
pub struct HttpTransport {
    client: Client,
    session: Arc<Session>,
    base_url: Url,
    referer: HeaderValue,
    timeout_seconds: u64,
}

impl HttpTransport {
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let session = Arc::new(Session::default());

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANG));

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .cookie_provider(session.jar.clone())
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .pool_max_idle_per_host(10)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        let referer = HeaderValue::from_str(base_url.as_str())?;

        Ok(Self {
            client,
            session,
            base_url,
            referer,
            timeout_seconds: config.timeout_seconds,
        })
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|e| TransportError::ConnectionRefused(format!("invalid upstream URL for '{path}': {e}")))
    }

    async fn attempt(&self, url: &Url, request: &UpstreamRequest) -> Result<Attempt, TransportError> {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(url.clone()).query(&request.params),
            HttpMethod::PostForm => self.client.post(url.clone()).form(&request.params),
        };

        let response = builder
            .header(REFERER, self.referer.clone())
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e, self.timeout_seconds))?;

        let status = response.status();
        let headers = response.headers().clone();
        let final_url = response.url().to_string();
        let body = self.read_body(response).await?;

        if is_challenge(status.as_u16(), &headers, &body) {
            return Ok(Attempt::Challenge);
        }
        match status {
            StatusCode::TOO_MANY_REQUESTS => return Err(TransportError::RateLimited),
            StatusCode::FORBIDDEN => return Err(TransportError::Forbidden),
            _ => {}
        }

        let content_type = ContentType::from_header(
            headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        );

        Ok(Attempt::Content(RawResponse {
            http_status: status.as_u16(),
            content_type,
            body,
            final_url,
        }))
    }

    /// Read a response body, enforcing [`MAX_RESPONSE_SIZE`].
    async fn read_body(&self, response: reqwest::Response) -> Result<Bytes, TransportError> {
        if let Some(cl) = response.content_length() {
            if cl as usize > MAX_RESPONSE_SIZE {
                return Err(TransportError::ResponseTooLarge { size: cl });
            }
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(&e, self.timeout_seconds))?;
        if bytes.len() > MAX_RESPONSE_SIZE {
            return Err(TransportError::ResponseTooLarge {
                size: bytes.len() as u64,
            });
        }
        Ok(bytes)
    }

    /// Visit the site root so the jar picks up fresh clearance cookies.
    /// Failures are ignored; the retry that follows reports the outcome.
    async fn negotiate(&self) {
        self.session.negotiated.store(true, Ordering::Relaxed);
        match self
            .client
            .get(self.base_url.clone())
            .header(REFERER, self.referer.clone())
            .send()
            .await
        {
            Ok(response) => debug!(status = %response.status(), "Challenge negotiation request completed"),
            Err(e) => debug!(error = %e, "Challenge negotiation request failed"),
        }
    }

    /// Attempt loop: a challenge triggers one negotiation and a retry.
    async fn fetch_negotiating(&self, url: &Url, request: &UpstreamRequest) -> Result<RawResponse, TransportError> {
        let mut delays = negotiation_backoff();

        for attempt in 1..=CHALLENGE_ATTEMPTS {
            match self.attempt(url, request).await? {
                Attempt::Content(raw) => {
                    debug!(status = raw.http_status, url = %raw.final_url, "Upstream responded");
                    return Ok(raw);
                }
                Attempt::Challenge if attempt < CHALLENGE_ATTEMPTS => {
                    warn!(attempt, url = %url, "Upstream served an anti-bot challenge, negotiating");
                    self.negotiate().await;
                    if let Some(delay) = delays.next() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Attempt::Challenge => {}
            }
        }

        warn!(url = %url, attempts = CHALLENGE_ATTEMPTS, "Anti-bot challenge unsolved");
        Err(TransportError::ChallengeUnsolved {
            attempts: CHALLENGE_ATTEMPTS,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    /// Retries and negotiation all share one `timeout_seconds` budget.
    async fn fetch(&self, request: &UpstreamRequest) -> Result<RawResponse, TransportError> {
        let url = self.url_for(&request.path)?;
        let budget = Duration::from_secs(self.timeout_seconds);

        tokio::time::timeout(budget, self.fetch_negotiating(&url, request))
            .await
            .unwrap_or_else(|_| {
                warn!(url = %url, seconds = self.timeout_seconds, "Upstream fetch exceeded its budget");
                Err(TransportError::Timeout {
                    seconds: self.timeout_seconds,
                })
            })
    }
}
