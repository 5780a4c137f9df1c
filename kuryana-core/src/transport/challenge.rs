//! Anti-bot challenge recognition and negotiation backoff

use std::time::Duration;

use backon::{BackoffBuilder, ExponentialBuilder};
use reqwest::header::HeaderMap;

/// Total attempts (first try included) before giving up on a challenge.
pub const CHALLENGE_ATTEMPTS: u32 = 2;

/// Interstitial markers are near the top of the page.
const SNIFF_LEN: usize = 64 * 1024;

const BODY_MARKERS: [&str; 4] = [
    "Just a moment...",
    "challenge-platform",
    "cf_chl_opt",
    "cf-browser-verification",
];

/// Whether a response is a bot-mitigation interstitial instead of content.
pub(crate) fn is_challenge(status: u16, headers: &HeaderMap, body: &[u8]) -> bool {
    let mitigated = headers
        .get("cf-mitigated")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("challenge"));
    if mitigated {
        return true;
    }

    if !matches!(status, 403 | 429 | 503) {
        return false;
    }

    let head = String::from_utf8_lossy(&body[..body.len().min(SNIFF_LEN)]);
    BODY_MARKERS.iter().any(|marker| head.contains(marker))
}

/// Delays between challenge attempts: 250ms base, 2s max, with jitter.
pub(crate) fn negotiation_backoff() -> impl Iterator<Item = Duration> {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(250))
        .with_max_delay(Duration::from_secs(2))
        .with_max_times(CHALLENGE_ATTEMPTS.saturating_sub(1) as usize)
        .with_jitter()
        .build()
}
