mod find_email;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tpsmail_scraper::{EmailLookup, LookupError};

use crate::middleware::{request_id, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<EmailLookup>,
}

/// JSON error body: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub code: &'static str,
    pub error: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ApiError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            error: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code {
            "bad_request" => StatusCode::BAD_REQUEST,
            "not_found" => StatusCode::NOT_FOUND,
            "bad_gateway" => StatusCode::BAD_GATEWAY,
            "gateway_timeout" => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_lookup_error(request_id: &str, error: &LookupError) -> ApiError {
    match error {
        LookupError::InvalidInput => ApiError::new("bad_request", "Missing 'name'"),
        LookupError::DetailLinkNotFound => {
            tracing::info!(request_id, "no detail link on results page");
            ApiError::new("not_found", "No detail link found")
        }
        LookupError::Fetch { .. } if error.is_timeout() => {
            tracing::error!(request_id, error = %error, "upstream fetch timed out");
            ApiError::new("gateway_timeout", "Upstream fetch timed out")
        }
        LookupError::Fetch { .. } | LookupError::InvalidDetailLink { .. } => {
            tracing::error!(request_id, error = %error, "upstream fetch failed");
            ApiError::new("bad_gateway", "Upstream fetch failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/find_email", post(find_email::find_email))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthData { status: "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::time::Duration;
    use tower::ServiceExt;
    use tpsmail_core::SiteConfig;
    use tpsmail_scraper::{FetchOptions, LookupSettings, ProxyClient};
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RESULTS_URL: &str =
        "https://www.truepeoplesearch.com/results?name=Jane+Doe&citystatezip=TX";
    const DETAIL_URL: &str =
        "https://www.truepeoplesearch.com/find/person/px7?name=Jane+Doe&citystatezip=TX";

    fn app_against(server: &MockServer, timeout_secs: u64) -> Router {
        let client = ProxyClient::with_base_url("test-token", timeout_secs, &server.uri())
            .expect("client");
        let site = SiteConfig {
            origin: "https://www.truepeoplesearch.com".to_string(),
            operator_domain: "truepeoplesearch.com".to_string(),
        };
        let settings = LookupSettings::from_site(&site, FetchOptions::default()).expect("settings");
        build_app(AppState {
            lookup: Arc::new(EmailLookup::new(client, settings)),
        })
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/find_email")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    async fn mount_page(server: &MockServer, target: &str, body: &str) {
        Mock::given(method("GET"))
            .and(query_param("url", target))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[test]
    fn api_error_codes_map_to_statuses() {
        let cases = [
            ("bad_request", StatusCode::BAD_REQUEST),
            ("not_found", StatusCode::NOT_FOUND),
            ("bad_gateway", StatusCode::BAD_GATEWAY),
            ("gateway_timeout", StatusCode::GATEWAY_TIMEOUT),
            ("anything_else", StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            assert_eq!(ApiError::new(code, "x").into_response().status(), status);
        }
    }

    #[test]
    fn api_error_serializes_only_message() {
        let json = serde_json::to_value(ApiError::new("not_found", "No detail link found"))
            .expect("serialize");
        assert_eq!(json, serde_json::json!({ "error": "No detail link found" }));
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let server = MockServer::start().await;
        let response = app_against(&server, 5)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(json_body(response).await, serde_json::json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn find_email_returns_emails_and_query() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            RESULTS_URL,
            r#"<a href="/find/person/px7">View Details</a>"#,
        )
        .await;
        mount_page(
            &server,
            DETAIL_URL,
            "<p>jane@example.com</p><p>support@truepeoplesearch.com</p>",
        )
        .await;

        let response = app_against(&server, 5)
            .oneshot(post_json(r#"{"name":" Jane Doe ","state":"TX"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({
                "query": { "name": "Jane Doe", "citystatezip": "TX" },
                "emails": ["jane@example.com"]
            })
        );
    }

    #[tokio::test]
    async fn find_email_reports_sentinel_when_no_emails() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            RESULTS_URL,
            r#"<a href="/find/person/px7">View Details</a>"#,
        )
        .await;
        mount_page(&server, DETAIL_URL, "<p>No contact info</p>").await;

        let response = app_against(&server, 5)
            .oneshot(post_json(r#"{"name":"Jane Doe","state":"TX"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["emails"], serde_json::json!(["not available"]));
    }

    #[tokio::test]
    async fn find_email_rejects_missing_or_blank_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        for body in [
            r#"{"city":"Austin"}"#,
            r#"{"name":"   "}"#,
            r#"{"name":42}"#,
            "not json",
            "",
        ] {
            let response = app_against(&server, 5)
                .oneshot(post_json(body))
                .await
                .expect("response");

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body:?}");
            assert_eq!(
                json_body(response).await,
                serde_json::json!({ "error": "Missing 'name'" })
            );
        }
    }

    #[tokio::test]
    async fn find_email_ignores_mistyped_optional_fields() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            RESULTS_URL,
            r#"<a href="/find/person/px7">View Details</a>"#,
        )
        .await;
        mount_page(&server, DETAIL_URL, "<p>jane@example.com</p>").await;

        let response = app_against(&server, 5)
            .oneshot(post_json(r#"{"name":"Jane Doe","city":5,"state":"TX"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({
                "query": { "name": "Jane Doe", "citystatezip": "TX" },
                "emails": ["jane@example.com"]
            })
        );
    }

    #[tokio::test]
    async fn find_email_returns_404_without_detail_link() {
        let server = MockServer::start().await;
        mount_page(&server, RESULTS_URL, "<p>No results</p>").await;

        let response = app_against(&server, 5)
            .oneshot(post_json(r#"{"name":"Jane Doe","state":"TX"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "error": "No detail link found" })
        );
    }

    #[tokio::test]
    async fn find_email_maps_proxy_failure_to_502() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let response = app_against(&server, 5)
            .oneshot(post_json(r#"{"name":"Jane Doe"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "error": "Upstream fetch failed" })
        );
    }

    #[tokio::test]
    async fn find_email_maps_proxy_timeout_to_504() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let response = app_against(&server, 1)
            .oneshot(post_json(r#"{"name":"Jane Doe"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "error": "Upstream fetch timed out" })
        );
    }
}
