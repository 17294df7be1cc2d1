//! Integration tests for `PageFetcher` and `CaptureClient`.
//!
//! Uses `wiremock` to stand up a local HTTP server per test so no real
//! network traffic is made.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use blens_scraper::{CaptureClient, PageFetcher};

fn test_fetcher() -> PageFetcher {
    PageFetcher::new(5, "blens-test/0.1").expect("failed to build test PageFetcher")
}

// ---------------------------------------------------------------------------
// PageFetcher
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_page_returns_body_on_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><p>hi</p></html>"))
        .mount(&server)
        .await;

    let body = test_fetcher().fetch_page(&server.uri()).await;
    assert_eq!(body.as_deref(), Some("<html><p>hi</p></html>"));
}

#[tokio::test]
async fn fetch_page_returns_body_on_non_success_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    // Only transport-level failures count as failures; an error page still
    // carries extractable content.
    let body = test_fetcher().fetch_page(&server.uri()).await;
    assert_eq!(body.as_deref(), Some("<html>maintenance</html>"));
}

#[tokio::test]
async fn fetch_page_resolves_to_none_when_both_attempts_fail() {
    // Port 1 is reserved and unbound: the primary and the www-fallback both
    // fail at the transport level.
    let body = test_fetcher().fetch_page("http://127.0.0.1:1").await;
    assert!(body.is_none());
}

// ---------------------------------------------------------------------------
// CaptureClient
// ---------------------------------------------------------------------------

#[tokio::test]
async fn capture_page_encodes_response_bytes() {
    let server = MockServer::start().await;
    let png_bytes: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a];

    Mock::given(method("POST"))
        .and(path("/screenshot"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes))
        .mount(&server)
        .await;

    let client = CaptureClient::new(&server.uri(), 5).expect("capture client");
    let encoded = client.capture_page("https://example.com").await;
    assert_eq!(encoded, Some(BASE64.encode(png_bytes)));
}

#[tokio::test]
async fn capture_page_normalizes_url_before_sending() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/screenshot"))
        .and(body_json(serde_json::json!({"url": "https://example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png".as_slice()))
        .expect(1)
        .mount(&server)
        .await;

    let client = CaptureClient::new(&server.uri(), 5).expect("capture client");
    let encoded = client.capture_page("example.com").await;
    assert!(encoded.is_some());
}

#[tokio::test]
async fn capture_page_resolves_to_none_on_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/screenshot"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = CaptureClient::new(&server.uri(), 5).expect("capture client");
    assert!(client.capture_page("https://example.com").await.is_none());
}

#[tokio::test]
async fn capture_page_resolves_to_none_on_empty_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/screenshot"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = CaptureClient::new(&server.uri(), 5).expect("capture client");
    assert!(client.capture_page("https://example.com").await.is_none());
}

#[tokio::test]
async fn capture_search_targets_results_page_for_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/screenshot"))
        .and(body_json(serde_json::json!({
            "url": "https://www.google.com/search?q=Acme%20Skates"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png".as_slice()))
        .expect(1)
        .mount(&server)
        .await;

    let client = CaptureClient::new(&server.uri(), 5).expect("capture client");
    let encoded = client.capture_search("Acme Skates").await;
    assert!(encoded.is_some());
}
