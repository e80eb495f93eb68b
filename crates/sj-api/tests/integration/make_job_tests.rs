//! Make-job endpoint tests.

use axum::http::StatusCode;
use serde_json::{json, Value};

use super::common::{
    create_router_with_state, create_test_router, post_json_request, send_request,
    send_request_raw,
};
use sj_api::AppState;
use sj_core::{PipelineConfig, ShareLinkConfig};

fn incident_with(entities: Value) -> Value {
    json!({ "object": { "properties": { "relatedEntities": entities } } })
}

fn bob() -> Value {
    json!({
        "kind": "Account",
        "properties": { "accountName": "bob", "upnSuffix": "corp.com", "friendlyName": "bob" }
    })
}

fn account_job() -> Value {
    json!({
        "item-type": "SOAR-trigger",
        "entity-type": "account",
        "query": "T | where U == \"%ENTITY%\""
    })
}

fn payload(job: Value) -> Value {
    json!({ "sentinel_incident": incident_with(json!([bob()])), "enrichment_job": job })
}

async fn post_job(uri: &str, payload: Value) -> (StatusCode, Value) {
    send_request(
        create_test_router(),
        post_json_request(uri, &payload.to_string()),
    )
    .await
}

#[tokio::test]
async fn test_account_job_materialized() {
    let (status, body) = post_job("/api/MakeJob", payload(account_job())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "0:ok");
    assert_eq!(body["jobs"].as_array().unwrap().len(), 1);
    assert_eq!(body["jobs"][0]["kind"], "Account");
    assert_eq!(body["jobs"][0]["entity_value"], "bob@corp.com");
    assert_eq!(body["jobs"][0]["query_to_run"], "T | where U == \"bob@corp.com\"");
    assert_eq!(body["distinct_entities"], json!(["account"]));
    assert_eq!(body["friendly_entities"], json!(["bob:account"]));
}

#[tokio::test]
async fn test_versioned_path() {
    let (status, body) = post_job("/api/v1/make-job", payload(account_job())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jobs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_no_entities_accepted_with_warning() {
    let (status, body) = post_job(
        "/api/MakeJob",
        json!({ "sentinel_incident": incident_with(json!([])), "enrichment_job": account_job() }),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["warnings"], "no entities in incident");
    assert!(body["jobs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_object_payload() {
    let (status, body) = post_job("/api/MakeJob", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "1:see_warnings,2:see_errors,");
    assert_eq!(body["errors"], "Job type not SOAR trigger");
}

#[tokio::test]
async fn test_invalid_job_rejected() {
    let mut job = account_job();
    job["additional_params"] = json!({
        "severity_change": [{ "results_count_mt": 3, "severity": "Critical" }]
    });
    let (status, body) = post_job("/api/MakeJob", payload(job)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        "Job Error: Job included severity change but did not specify a Low/Medium/High/Informational"
    );
}

#[tokio::test]
async fn test_malformed_payload_is_teapot() {
    let (status, body) = post_job("/api/MakeJob", payload(json!("SOAR-trigger"))).await;

    assert_eq!(status, StatusCode::IM_A_TEAPOT);
    assert_eq!(body["errors"], "incorrect schema or malformed payload");
}

#[tokio::test]
async fn test_unmatched_entity_type() {
    let mut job = account_job();
    job["entity-type"] = json!("host");
    let (status, body) = post_job("/api/MakeJob", payload(job)).await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "0:job entity type not in sentinel incident");
    assert_eq!(body["customised_entities"][0]["entity_value"], "bob@corp.com");
}

#[tokio::test]
async fn test_missing_body_is_plain_text_500() {
    let (status, body) =
        send_request_raw(create_test_router(), post_json_request("/api/MakeJob", "")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Missing JSON payload");
}

#[tokio::test]
async fn test_non_object_body_is_plain_text_500() {
    let (status, body) =
        send_request_raw(create_test_router(), post_json_request("/api/MakeJob", "[1, 2]")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Missing JSON payload");
}

#[tokio::test]
async fn test_pipeline_config_from_state() {
    let state = AppState::new(
        PipelineConfig {
            match_upn: false,
            rewrite_queries: true,
        },
        ShareLinkConfig::default(),
    );
    let (status, body): (StatusCode, Value) = send_request(
        create_router_with_state(state),
        post_json_request("/api/MakeJob", &payload(account_job()).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jobs"][0]["query_to_run"], "T | where U == \"bob\"");
}
