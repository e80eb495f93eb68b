//! Share-link endpoint tests.

use axum::http::StatusCode;
use serde_json::{json, Value};

use super::common::{create_test_router, post_json_request, send_request, send_request_raw};

async fn post_share(payload: Value) -> (StatusCode, Value) {
    send_request(
        create_test_router(),
        post_json_request("/api/MakeLaShareUrl", &payload.to_string()),
    )
    .await
}

fn encoded_query(url: &str) -> &str {
    url.split("/q/")
        .nth(1)
        .and_then(|rest| rest.split('/').next())
        .unwrap()
}

#[tokio::test]
async fn test_share_url_built() {
    let (status, body) = post_share(json!({
        "query": "SigninLogs | take 1",
        "subscription_id": "some_guid",
        "resource_group": "my_resources",
        "workspace_name": "my_sentinel01"
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["errors"], "");
    let url = body["share_url"].as_str().unwrap();
    assert!(url.contains("%2Fsubscriptions%2Fsome_guid%2FresourceGroups%2Fmy_resources"));
    assert_eq!(
        sj_core::decode_query(encoded_query(url)).unwrap(),
        "SigninLogs | take 1"
    );
}

#[tokio::test]
async fn test_query_now_and_timespan() {
    let (status, body) = post_share(json!({
        "query": "SigninLogs | take 1",
        "subscription_id": "some_guid",
        "resource_group": "my_resources",
        "workspace_name": "my_sentinel01",
        "timespan": "P7D",
        "set_query_now": true
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    let url = body["share_url"].as_str().unwrap();
    assert!(url.ends_with("/timespan/P7D"));
    let query = sj_core::decode_query(encoded_query(url)).unwrap();
    assert!(query.starts_with("set query_now = datetime("));
    assert!(query.ends_with(");\nSigninLogs | take 1"));
}

#[tokio::test]
async fn test_missing_fields_reported() {
    let (status, body) = post_share(json!({
        "query": "SigninLogs | take 1",
        "resource_group": "my_resources",
        "workspace_name": ""
    }))
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["share_url"], "");
    assert_eq!(body["errors"], "Subscription ID empty;Workspace name empty");
}

#[tokio::test]
async fn test_v1_path_and_missing_body() {
    let (status, body) = send_request_raw(
        create_test_router(),
        post_json_request("/api/v1/share-url", "not json"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Missing JSON payload");
}
