//! Route-layer tests for the HTTP ingress.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use outdial_engine::prelude::*;
use outdial_server::router;

fn test_engine() -> Arc<CampaignEngine> {
    let provider = Arc::new(FakeTelephony::new());
    CampaignEngine::new(CampaignConfig::default(), provider).expect("engine should build")
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn push_data_accepts_a_valid_dataset() {
    let engine = test_engine();
    let app = router(engine.clone());

    let body = json!({
        "credential": { "username": "7001", "password": "secret" },
        "items": [
            { "name": "A", "primary_phone": "0811" },
            { "name": "B", "primary_phone": "0812", "ec1_phone": "0821" },
        ],
    });
    let response = app.oneshot(json_request("POST", "/push-data", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let reply = body_json(response).await;
    assert_eq!(reply["status"], "ok");
    assert_eq!(reply["enqueued"], 2);
    assert_eq!(reply["queue_size"], 2);
    assert_eq!(engine.status().queue_depth, 2);
}

#[tokio::test]
async fn push_data_rejects_malformed_bodies_without_enqueueing() {
    let engine = test_engine();
    let app = router(engine.clone());

    // Items present but no credential at all.
    let missing_credential = json!({ "items": [{ "name": "A", "primary_phone": "0811" }] });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/push-data", missing_credential))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Structurally fine but empty item list.
    let empty_items = json!({
        "credential": { "username": "7001", "password": "secret" },
        "items": [],
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/push-data", empty_items))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let reply = body_json(response).await;
    assert_eq!(reply["status"], "error");

    assert_eq!(engine.status().queue_depth, 0);
}

#[tokio::test]
async fn control_routes_map_to_engine_actions() {
    let engine = test_engine();
    let app = router(engine.clone());

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/call", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let reply = body_json(response).await;
    assert_eq!(reply["action"], "call");
    assert_eq!(reply["applied"], true);
    assert!(engine.status().running);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/reboot", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_and_events_round_trip() {
    let engine = test_engine();
    let app = router(engine.clone());

    engine
        .submit_dataset(DatasetSubmission {
            credential: DialIdentity {
                username: "7001".to_string(),
                password: "secret".to_string(),
            },
            items: vec![ContactItem {
                name: "A".to_string(),
                primary_phone: "0811".to_string(),
                ec1_name: String::new(),
                ec1_phone: String::new(),
                ec2_name: String::new(),
                ec2_phone: String::new(),
                amount_due: String::new(),
            }],
        })
        .unwrap();

    let response = app.clone().oneshot(get_request("/api/log")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let status = body_json(response).await;
    assert_eq!(status["queue_depth"], 1);
    assert_eq!(status["queued"], 1);
    assert_eq!(status["running"], false);

    let response = app.clone().oneshot(get_request("/events")).await.unwrap();
    let page = body_json(response).await;
    assert_eq!(page["events"].as_array().unwrap().len(), 1);
    assert_eq!(page["events"][0]["kind"], "dataset");
    let last_id = page["last_id"].as_u64().unwrap();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/events?since={last_id}")))
        .await
        .unwrap();
    let page = body_json(response).await;
    assert!(page["events"].as_array().unwrap().is_empty());
    assert_eq!(page["last_id"].as_u64().unwrap(), last_id);
}

#[tokio::test]
async fn register_client_builds_the_base_url() {
    let engine = test_engine();
    let app = router(engine.clone());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register-client",
            json!({ "ip": "192.168.88.201" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let reply = body_json(response).await;
    // Default client port fills in when none is given.
    assert_eq!(reply["connected_clients"][0], "http://192.168.88.201:6000");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register-client",
            json!({ "ip": "", "port": 6100 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
