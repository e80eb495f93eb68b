//! Health, readiness and metrics endpoint tests.

use axum::http::StatusCode;
use serde_json::Value;

use super::common::{
    create_router_with_state, create_test_router, get_request, send_request, send_request_raw,
};
use sj_api::AppState;

#[tokio::test]
async fn test_health_endpoint_contract() {
    let (status, response): (StatusCode, Value) =
        send_request(create_test_router(), get_request("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert!(response["version"].is_string());
    assert!(response["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_readiness_and_liveness() {
    for path in ["/ready", "/live"] {
        let (status, _) = send_request_raw(create_test_router(), get_request(path)).await;
        assert_eq!(status, StatusCode::OK, "{}", path);
    }
}

#[tokio::test]
async fn test_metrics_unavailable_without_exporter() {
    let (status, body) = send_request_raw(create_test_router(), get_request("/metrics")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.contains("Prometheus metrics not initialized"));
}

#[tokio::test]
async fn test_openapi_document_served() {
    let router = create_router_with_state(AppState::default());
    let (status, schema): (StatusCode, Value) =
        send_request(router, get_request("/api-docs/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(schema.get("openapi").is_some());
    assert!(schema["paths"].get("/api/MakeJob").is_some());
}

#[tokio::test]
async fn test_request_id_echoed() {
    use tower::ServiceExt;

    let request = axum::extract::Request::builder()
        .uri("/live")
        .header("X-Request-Id", "req-123")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = create_test_router().oneshot(request).await.unwrap();

    assert_eq!(response.headers()["X-Request-Id"], "req-123");
}

#[tokio::test]
async fn test_request_id_generated_when_absent() {
    use tower::ServiceExt;

    let response = create_test_router()
        .oneshot(get_request("/live"))
        .await
        .unwrap();

    let id = response.headers()["X-Request-Id"].to_str().unwrap();
    assert_eq!(id.len(), 36);
    assert_eq!(id.matches('-').count(), 4);
}
