//! Local stand-in for the Noonyar backend.
//!
//! Serves the accounts and queue endpoints on an ephemeral port so the
//! reqwest clients can be exercised end to end.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Code the backend accepts
pub const VALID_CODE: &str = "12345";
/// Phone the backend already knows
pub const EXISTING_PHONE: &str = "09121112233";
/// Phone the SMS provider always fails for
pub const FAILING_PHONE: &str = "09000000000";

#[derive(Clone, Default)]
struct BackendState {
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

impl BackendState {
    fn record(&self, path: &str, body: Value) {
        self.requests.lock().unwrap().push((path.to_string(), body));
    }
}

pub struct FakeBackend {
    pub api_url: String,
    state: BackendState,
    server: JoinHandle<()>,
}

impl AsyncTestContext for FakeBackend {
    async fn setup() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let state = BackendState::default();
        let app = Router::new()
            .route("/api/accounts/send-code/", post(send_code))
            .route("/api/accounts/verify-code/", post(verify_code))
            .route("/res/", get(queue_status))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Fake backend has no address");

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fake backend crashed");
        });

        Self {
            api_url: format!("http://{}", addr),
            state,
            server,
        }
    }

    async fn teardown(self) {
        self.server.abort();
    }
}

impl FakeBackend {
    pub fn accounts_url(&self) -> String {
        format!("{}/api/accounts", self.api_url)
    }

    /// Every request body received, with its path
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn send_code(State(state): State<BackendState>, Json(body): Json<Value>) -> Response {
    state.record("send-code", body.clone());

    if body["phone_number"] == FAILING_PHONE {
        return (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "detail": "sms provider unavailable" })),
        )
            .into_response();
    }

    Json(json!({ "message": "code sent" })).into_response()
}

async fn verify_code(State(state): State<BackendState>, Json(body): Json<Value>) -> Response {
    state.record("verify-code", body.clone());

    if body["code"] != VALID_CODE {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Code is invalid or expired" })),
        )
            .into_response();
    }

    if body["phone_number"] == EXISTING_PHONE {
        Json(json!({
            "is_new_user": false,
            "tokens": { "access": "access-jwt", "refresh": "refresh-jwt" }
        }))
        .into_response()
    } else {
        Json(json!({
            "is_new_user": true,
            "registration_token": "registration-jwt"
        }))
        .into_response()
    }
}

async fn queue_status(
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let bakery = params.get("b").cloned().unwrap_or_default();
    let ticket: u64 = params.get("t").and_then(|t| t.parse().ok()).unwrap_or(0);

    match bakery.as_str() {
        "404" => return Json(json!({ "msg": "bakery does not exist" })).into_response(),
        "500" => return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => {}
    }

    let token = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookie| cookie.strip_prefix("access_token="))
        .map(|t| t.to_string());

    Json(json!({
        "ready": false,
        "accurate_time": true,
        "wait_until": 300,
        "is_user_exists": ticket == 7,
        "people_in_queue": 2,
        "empty_slot_time_avg": 45,
        "in_queue_customers_time": 255,
        "user_breads": if ticket == 7 { json!({ "Barbari": 2 }) } else { Value::Null },
        "data": token.map(|t| json!({ "token": t })).unwrap_or(Value::Null),
    }))
    .into_response()
}
