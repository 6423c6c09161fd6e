//! # OUTDIAL HTTP Ingress
//!
//! Thin route layer over [`CampaignEngine`]: every handler validates its
//! input, delegates to the engine, and mirrors the engine's answer into a
//! JSON body. No orchestration logic lives here.
//!
//! ## Routes
//!
//! - `POST /push-data` — submit a dataset `{credential, items}`
//! - `POST /api/{action}` — one of `call`, `pause`, `start`, `stop`
//! - `GET /api/log` — control-state snapshot plus queue depth
//! - `GET /events?since=N` — incremental event poll
//! - `POST /register-client` — add a display client `{ip, port?}`

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use outdial_engine::prelude::*;

/// Build the ingress router around an engine.
pub fn router(engine: Arc<CampaignEngine>) -> Router {
    Router::new()
        .route("/push-data", post(push_data))
        .route("/api/log", get(status))
        .route("/api/:action", post(control))
        .route("/events", get(events))
        .route("/register-client", post(register_client))
        .with_state(engine)
}

fn error_body(message: impl std::fmt::Display) -> Json<Value> {
    Json(json!({ "status": "error", "message": message.to_string() }))
}

async fn push_data(
    State(engine): State<Arc<CampaignEngine>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let submission: DatasetSubmission = match serde_json::from_value(body) {
        Ok(submission) => submission,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                error_body(format!("malformed dataset: {e}")),
            )
        }
    };
    match engine.submit_dataset(submission) {
        Ok(receipt) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "enqueued": receipt.enqueued,
                "queue_size": receipt.queue_depth,
            })),
        ),
        Err(e) => (StatusCode::BAD_REQUEST, error_body(e)),
    }
}

async fn control(
    State(engine): State<Arc<CampaignEngine>>,
    Path(action): Path<String>,
) -> (StatusCode, Json<Value>) {
    let action: ControlAction = match action.parse() {
        Ok(action) => action,
        Err(e) => return (StatusCode::BAD_REQUEST, error_body(e)),
    };
    let report = engine.apply_control(action).await;
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "action": report.action,
            "applied": report.applied,
            "message": report.message,
        })),
    )
}

async fn status(State(engine): State<Arc<CampaignEngine>>) -> Json<StatusSnapshot> {
    Json(engine.status())
}

#[derive(Debug, Deserialize)]
struct EventsQuery {
    #[serde(default)]
    since: u64,
}

async fn events(
    State(engine): State<Arc<CampaignEngine>>,
    Query(query): Query<EventsQuery>,
) -> Json<EventPage> {
    Json(engine.events_since(query.since))
}

#[derive(Debug, Deserialize)]
struct RegisterClient {
    ip: String,
    port: Option<u16>,
}

async fn register_client(
    State(engine): State<Arc<CampaignEngine>>,
    Json(body): Json<RegisterClient>,
) -> (StatusCode, Json<Value>) {
    if body.ip.is_empty() {
        return (StatusCode::BAD_REQUEST, error_body("ip is required"));
    }
    let port = body.port.unwrap_or(engine.config().clients.default_port);
    let clients = engine.register_client(format!("http://{}:{}", body.ip, port));
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "connected_clients": clients })),
    )
}
