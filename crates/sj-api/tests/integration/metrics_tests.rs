//! Prometheus exporter tests.
//!
//! The recorder is process-global, so it is installed once for this test
//! binary and assertions only look for series, never exact totals.

use axum::http::StatusCode;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::sync::OnceLock;

use super::common::{create_router_with_state, get_request, post_json_request, send_request_raw};
use sj_api::AppState;

fn prometheus_handle() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE
        .get_or_init(|| sj_observability::install_prometheus_recorder().unwrap())
        .clone()
}

fn state_with_metrics() -> AppState {
    AppState::default().with_prometheus_handle(prometheus_handle())
}

#[tokio::test]
async fn test_make_job_counted() {
    let payload = json!({
        "sentinel_incident": { "object": { "properties": { "relatedEntities": [{
            "kind": "Ip",
            "properties": { "friendlyName": "10.0.0.1" }
        }] } } },
        "enrichment_job": {
            "item-type": "SOAR-trigger",
            "entity-type": "ip",
            "query": "T | where Ip == \"%ENTITY%\""
        }
    });
    let (status, _) = send_request_raw(
        create_router_with_state(state_with_metrics()),
        post_json_request("/api/MakeJob", &payload.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_request_raw(
        create_router_with_state(state_with_metrics()),
        get_request("/metrics"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("sj_make_job_requests_total{outcome=\"ok\"}"), "{}", body);
    assert!(body.contains("sj_jobs_materialized_total"), "{}", body);
}

#[tokio::test]
async fn test_share_url_failure_counted() {
    let (status, _) = send_request_raw(
        create_router_with_state(state_with_metrics()),
        post_json_request("/api/MakeLaShareUrl", "{}"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (_, body) = send_request_raw(
        create_router_with_state(state_with_metrics()),
        get_request("/metrics"),
    )
    .await;
    assert!(body.contains("sj_share_urls_total{outcome=\"error\"}"), "{}", body);
}
