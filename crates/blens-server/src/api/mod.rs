mod audit;
mod competitors;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use blens_audit::{AuditDeps, AuditError};

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState,
};

#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<AuditDeps>,
}

/// JSON error response: always the flat `{ "error": message }` shape the
/// payload contract promises — no stack traces, no internal diagnostics.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    error: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: message.into(),
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            error: message.into(),
        }
    }
}

impl From<AuditError> for ApiError {
    /// Input errors map to 400; everything else is a downstream-analysis
    /// failure surfaced as 502.
    fn from(err: AuditError) -> Self {
        if err.is_input_error() {
            Self::bad_request(err.to_string())
        } else {
            tracing::error!(error = %err, "audit pipeline failed");
            Self::bad_gateway(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/audit", post(audit::run_audit_handler))
        .route(
            "/api/v1/competitors/suggest",
            post(competitors::suggest_handler),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthData { status: "ok" }))
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(60, Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method as wm_method, path as wm_path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use blens_llm::LlmClient;
    use blens_scraper::PageFetcher;

    /// State whose upstream endpoints are unroutable — fine for tests that
    /// must fail before any external call.
    fn offline_state() -> AppState {
        AppState {
            deps: Arc::new(AuditDeps {
                fetcher: PageFetcher::new(1, "blens-test/0.1").expect("fetcher"),
                capture: None,
                llm: LlmClient::new("http://127.0.0.1:1", "sk-test", "test-model", 1)
                    .expect("llm client"),
                call_delay_ms: 0,
                compare_delay_ms: 0,
            }),
        }
    }

    fn test_app(state: AppState) -> Router {
        let auth = AuthState::from_env(true).expect("auth");
        build_app(state, auth, default_rate_limit_state())
    }

    fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json parse")
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = test_app(offline_state())
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn audit_with_missing_fields_returns_400_error_body() {
        let response = test_app(offline_state())
            .oneshot(post_json("/api/v1/audit", &json!({ "companyUrl": "" })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].is_string());
        // The flat contract: nothing beyond the error message leaks out.
        assert_eq!(json.as_object().map(serde_json::Map::len), Some(1));
    }

    #[tokio::test]
    async fn audit_with_empty_competitors_returns_400() {
        let body = json!({
            "companyUrl": "https://acme.example",
            "companyName": "Acme",
            "competitors": []
        });
        let response = test_app(offline_state())
            .oneshot(post_json("/api/v1/audit", &body))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn audit_with_invalid_json_body_returns_400_error_body() {
        let response = test_app(offline_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/audit")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn suggest_with_missing_name_returns_400() {
        let response = test_app(offline_state())
            .oneshot(post_json(
                "/api/v1/competitors/suggest",
                &json!({ "companyUrl": "https://acme.example" }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn responses_carry_request_id_header() {
        let response = test_app(offline_state())
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "req-test-42")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response.headers().get("x-request-id").map(|v| v.to_str().unwrap()),
            Some("req-test-42")
        );
    }

    #[tokio::test]
    async fn suggest_happy_path_returns_competitor_list() {
        let llm_server = MockServer::start().await;
        let page_server = MockServer::start().await;

        Mock::given(wm_method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><h1>Acme</h1><p>Rocket skates.</p></html>"),
            )
            .mount(&page_server)
            .await;

        let reply = json!({ "choices": [{ "message": { "content":
            "{\"competitors\": [{\"name\": \"Rival\", \"url\": \"https://rival.example\", \"reason\": \"same market\"}]}"
        } }] });
        Mock::given(wm_method("POST"))
            .and(wm_path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&reply))
            .mount(&llm_server)
            .await;

        let state = AppState {
            deps: Arc::new(AuditDeps {
                fetcher: PageFetcher::new(5, "blens-test/0.1").expect("fetcher"),
                capture: None,
                llm: LlmClient::new(&llm_server.uri(), "sk-test", "test-model", 5)
                    .expect("llm client"),
                call_delay_ms: 0,
                compare_delay_ms: 0,
            }),
        };

        let body = json!({ "companyUrl": page_server.uri(), "companyName": "Acme" });
        let response = test_app(state)
            .oneshot(post_json("/api/v1/competitors/suggest", &body))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let competitors = json["competitors"].as_array().expect("competitors array");
        assert_eq!(competitors.len(), 1);
        assert_eq!(competitors[0]["name"], "Rival");
    }

    #[tokio::test]
    async fn suggest_upstream_failure_returns_502_error_body() {
        let llm_server = MockServer::start().await;
        let page_server = MockServer::start().await;

        Mock::given(wm_method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&page_server)
            .await;
        // Unparseable model reply: the stage fails, the endpoint maps it to 502.
        let reply = json!({ "choices": [{ "message": { "content": "no json" } }] });
        Mock::given(wm_method("POST"))
            .and(wm_path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&reply))
            .mount(&llm_server)
            .await;

        let state = AppState {
            deps: Arc::new(AuditDeps {
                fetcher: PageFetcher::new(5, "blens-test/0.1").expect("fetcher"),
                capture: None,
                llm: LlmClient::new(&llm_server.uri(), "sk-test", "test-model", 5)
                    .expect("llm client"),
                call_delay_ms: 0,
                compare_delay_ms: 0,
            }),
        };

        let body = json!({ "companyUrl": page_server.uri(), "companyName": "Acme" });
        let response = test_app(state)
            .oneshot(post_json("/api/v1/competitors/suggest", &body))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert!(json["error"].is_string());
    }
}
