//! End-to-end dispatch against a mock upstream.

use std::sync::Arc;
use std::time::Duration;

use kuryana_core::config::UpstreamConfig;
use kuryana_core::{Dispatcher, ErrorKind, HttpTransport, OutcomeBody, QueryOptions, ResourceKind};
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DRAMA_PAGE: &str = r#"
<html><head><title>Goblin (2016) - MyDramaList</title></head><body>
<h1 class="film-title"><a href="/18452-goblin">Goblin (2016)</a></h1>
<div class="film-cover"><img src="https://i.mdl/goblin_c.jpg"></div>
<div class="show-synopsis"><p>A goblin seeks his bride.</p></div>
<ul class="list">
  <li class="list-item"><b class="inline">Country:</b> South Korea</li>
  <li class="list-item"><b class="inline">Episodes:</b> 16</li>
</ul>
</body></html>"#;

const CHALLENGE_PAGE: &str =
    "<html><head><title>Just a moment...</title></head><body><script src='/cdn-cgi/challenge-platform/x'></script></body></html>";

fn dispatcher_for(server: &MockServer, timeout_seconds: u64) -> Dispatcher {
    let config = UpstreamConfig {
        base_url: server.uri(),
        timeout_seconds,
        connect_timeout_seconds: timeout_seconds,
        ..UpstreamConfig::default()
    };
    let transport = HttpTransport::new(&config).expect("transport builds");
    Dispatcher::new(Arc::new(transport))
}

fn body_json(body: &OutcomeBody) -> Value {
    serde_json::to_value(body).expect("body serializes")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_drama_page_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/18452-goblin"))
        .respond_with(html(DRAMA_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = dispatcher_for(&server, 5)
        .dispatch(ResourceKind::Drama, "18452-goblin", QueryOptions::new())
        .await;

    assert_eq!(envelope.status.as_u16(), 200);
    let json = body_json(&envelope.body);
    assert_eq!(json["title"], json!("Goblin (2016)"));
    assert_eq!(json["episodes"], json!(16));
    assert_eq!(json["synopsis"], json!("A goblin seeks his bride."));
    assert_eq!(json["slug"], json!("18452-goblin"));
    assert_eq!(json["recommendations"], json!([]));
}

#[tokio::test]
async fn test_upstream_404_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/people/1-nobody"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&server)
        .await;

    let envelope = dispatcher_for(&server, 5)
        .dispatch(ResourceKind::Person, "1-nobody", QueryOptions::new())
        .await;

    assert_eq!(envelope.status.as_u16(), 404);
    assert_eq!(envelope.error_kind(), Some(ErrorKind::NotFound));
}

#[tokio::test]
async fn test_unsolved_challenge_is_retried_once_then_blocked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/18452-goblin"))
        .respond_with(ResponseTemplate::new(403).set_body_raw(CHALLENGE_PAGE.as_bytes().to_vec(), "text/html"))
        .expect(2)
        .mount(&server)
        .await;

    let envelope = dispatcher_for(&server, 5)
        .dispatch(ResourceKind::Drama, "18452-goblin", QueryOptions::new())
        .await;

    assert_eq!(envelope.status.as_u16(), 503);
    assert_eq!(envelope.error_kind(), Some(ErrorKind::UpstreamBlocked));
}

#[tokio::test]
async fn test_rate_limit_is_blocked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list/abc"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = dispatcher_for(&server, 5)
        .dispatch(ResourceKind::CuratedList, "abc", QueryOptions::new())
        .await;

    assert_eq!(envelope.status.as_u16(), 503);
    assert_eq!(envelope.error_kind(), Some(ErrorKind::UpstreamBlocked));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/18452-goblin/cast"))
        .respond_with(html(DRAMA_PAGE).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let envelope = dispatcher_for(&server, 1)
        .dispatch(ResourceKind::Cast, "18452-goblin", QueryOptions::new())
        .await;

    assert_eq!(envelope.status.as_u16(), 504);
    assert_eq!(envelope.error_kind(), Some(ErrorKind::Timeout));
}

#[tokio::test]
async fn test_threads_query_and_pass_through() {
    let server = MockServer::start().await;
    let payload = json!({ "threads": [{ "id": 7, "message": "Great show" }], "total": 1 });
    Mock::given(method("GET"))
        .and(path("/v1/threads"))
        .and(query_param("t", "687393"))
        .and(query_param("c", "title"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "50"))
        .and(query_param("sort", "recent"))
        .and(query_param("lang", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = dispatcher_for(&server, 5)
        .dispatch(
            ResourceKind::Threads,
            "687393-the-prisoner-of-beauty",
            QueryOptions::new().with("page", "2"),
        )
        .await;

    assert_eq!(envelope.status.as_u16(), 200);
    assert_eq!(body_json(&envelope.body), payload);
}

#[tokio::test]
async fn test_seasonal_calendar_posts_form() {
    let server = MockServer::start().await;
    let payload = json!([{ "id": 1, "title": "Signal" }]);
    Mock::given(method("POST"))
        .and(path("/v1/quarter_calendar"))
        .and(body_string_contains("year=2021"))
        .and(body_string_contains("quarter=4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let options = QueryOptions::new().with("year", "2021").with("quarter", "4");
    let envelope = dispatcher_for(&server, 5)
        .dispatch(ResourceKind::SeasonalCalendar, "2021-4", options)
        .await;

    assert_eq!(envelope.status.as_u16(), 200);
    assert_eq!(body_json(&envelope.body), payload);
}

#[tokio::test]
async fn test_changed_markup_is_upstream_changed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/18452-goblin/episodes"))
        .respond_with(html("<html><body><main>redesigned</main></body></html>"))
        .mount(&server)
        .await;

    let envelope = dispatcher_for(&server, 5)
        .dispatch(ResourceKind::Episodes, "18452-goblin", QueryOptions::new())
        .await;

    assert_eq!(envelope.status.as_u16(), 502);
    assert_eq!(envelope.error_kind(), Some(ErrorKind::UpstreamChanged));
}

#[tokio::test]
async fn test_challenge_retries_share_one_budget() {
    let server = MockServer::start().await;
    // Each attempt fits in the budget on its own, two of them do not.
    Mock::given(method("GET"))
        .and(path("/18452-goblin"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_raw(CHALLENGE_PAGE.as_bytes().to_vec(), "text/html")
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let envelope = dispatcher_for(&server, 2)
        .dispatch(ResourceKind::Drama, "18452-goblin", QueryOptions::new())
        .await;

    assert_eq!(envelope.status.as_u16(), 504);
    assert_eq!(envelope.error_kind(), Some(ErrorKind::Timeout));
}

#[tokio::test]
async fn test_plain_forbidden_is_blocked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/people/1-someone"))
        .respond_with(ResponseTemplate::new(403).set_body_raw(b"<h1>Forbidden</h1>".to_vec(), "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = dispatcher_for(&server, 5)
        .dispatch(ResourceKind::Person, "1-someone", QueryOptions::new())
        .await;

    assert_eq!(envelope.status.as_u16(), 503);
    assert_eq!(envelope.error_kind(), Some(ErrorKind::UpstreamBlocked));
}

#[tokio::test]
async fn test_threads_rejected_sort_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/threads"))
        .and(query_param("sort", "loudest"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid sort" })))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = dispatcher_for(&server, 5)
        .dispatch(
            ResourceKind::Threads,
            "687393-the-prisoner-of-beauty",
            QueryOptions::new().with("sort", "loudest"),
        )
        .await;

    assert_eq!(envelope.status.as_u16(), 400);
    assert_eq!(envelope.error_kind(), Some(ErrorKind::Invalid));
    assert_eq!(body_json(&envelope.body)["message"], json!("invalid sort"));
}
