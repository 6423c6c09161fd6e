//! Broadcaster tests against a stub display client.
//!
//! A tiny axum receiver plays the role of a dashboard; a second,
//! unreachable registration exercises the prune-on-failure policy.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;

use outdial_engine::prelude::*;

type Received = Arc<Mutex<Vec<serde_json::Value>>>;

async fn receive(State(store): State<Received>, Json(body): Json<serde_json::Value>) -> StatusCode {
    store.lock().push(body);
    StatusCode::OK
}

/// Bind a stub display client on an ephemeral port; returns its base URL.
async fn spawn_stub_client(store: Received) -> String {
    let app = Router::new()
        .route("/receive-info", post(receive))
        .with_state(store);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("stub client should bind");
    let addr = listener.local_addr().expect("stub client address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub client serve");
    });
    format!("http://{addr}")
}

async fn wait_for(deadline: Duration, what: &str, mut cond: impl FnMut() -> bool) {
    let start = Instant::now();
    while !cond() {
        assert!(
            start.elapsed() < deadline,
            "timed out after {deadline:?} waiting for: {what}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn pushes_dataset_payloads_and_prunes_dead_clients() {
    let mut config = CampaignConfig::default();
    config.clients.push_timeout = Duration::from_millis(500);
    let fake = Arc::new(FakeTelephony::new());
    let engine = CampaignEngine::new(config, fake).expect("engine should build");

    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let live = spawn_stub_client(received.clone()).await;

    // Nothing listens on the discard port; the connection is refused and
    // the address must be pruned after one push round.
    let dead = "http://127.0.0.1:9".to_string();
    engine.register_client(live.clone());
    let registered = engine.register_client(dead.clone());
    assert_eq!(registered.len(), 2);

    engine
        .submit_dataset(DatasetSubmission {
            credential: DialIdentity {
                username: "7001".to_string(),
                password: "secret".to_string(),
            },
            items: vec![ContactItem {
                name: "Pushed".to_string(),
                primary_phone: "0811".to_string(),
                ec1_name: String::new(),
                ec1_phone: String::new(),
                ec2_name: String::new(),
                ec2_phone: String::new(),
                amount_due: String::new(),
            }],
        })
        .expect("submission should be accepted");

    wait_for(Duration::from_secs(3), "dataset push", || {
        !received.lock().is_empty()
    })
    .await;

    let body = received.lock()[0].clone();
    assert_eq!(body["credential_user"], "7001");
    assert_eq!(body["items"][0]["name"], "Pushed");
    // Credentials never leave the engine.
    assert!(body.get("credential").is_none());

    wait_for(Duration::from_secs(3), "dead client pruned", || {
        engine.registered_clients() == vec![live.clone()]
    })
    .await;
}
