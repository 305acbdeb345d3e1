//! Shared integration-test harness: an in-process JSON-RPC 2.0 server on an
//! ephemeral port, optionally misbehaving in one specific way.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::{Value, json};

use rpc_certify::case::{INVALID_CONTENT_TYPE_BODY, JSON_CONTENT_TYPE};
use rpc_certify::config::{FixtureLoader, FixtureSet, HarnessConfig};
use rpc_certify::jsonrpc::{
    INVALID_REQUEST_MESSAGE, JSONRPC_VERSION, error_codes, error_envelope,
};

/// How the mock server deviates from JSON-RPC 2.0 over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Follows every rule the harness checks.
    Conformant,
    /// Sends a response to requests without an `id`.
    AnswersNotifications,
    /// Adds an `extra` key to every success envelope.
    ExtraKey,
    /// Processes bodies regardless of the declared content type.
    IgnoresContentType,
    /// Never answers.
    Hangs,
}

struct MockState {
    behavior: Behavior,
    methods: HashMap<String, Value>,
    hits: AtomicUsize,
}

/// A running mock server. The serving task is aborted on drop.
pub struct MockServer {
    url: String,
    state: Arc<MockState>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockServer {
    /// Starts a server answering the methods in `tests/fixtures/eth.yaml`.
    #[allow(clippy::missing_panics_doc)]
    pub async fn start(behavior: Behavior) -> Self {
        let methods = load_fixtures("eth.yaml")
            .iter()
            .map(|f| (f.method.clone(), f.result.clone()))
            .collect();

        let state = Arc::new(MockState {
            behavior,
            methods,
            hits: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/", post(handle_rpc))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock server");
        let addr = listener.local_addr().expect("no local address");

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: format!("http://{addr}/"),
            state,
            handle,
        }
    }

    /// URL requests should be POSTed to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Harness configuration targeting this server.
    pub fn config(&self) -> HarnessConfig {
        HarnessConfig::with_base_url(self.url.clone())
    }

    /// Number of requests received so far.
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_rpc(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);

    if state.behavior == Behavior::Hangs {
        tokio::time::sleep(Duration::from_secs(30)).await;
    }

    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with(JSON_CONTENT_TYPE));
    if !is_json && state.behavior != Behavior::IgnoresContentType {
        return (StatusCode::OK, INVALID_CONTENT_TYPE_BODY).into_response();
    }

    let Ok(request) = serde_json::from_slice::<Value>(&body) else {
        let envelope = error_envelope(None, error_codes::PARSE_ERROR, "Parse error");
        return (StatusCode::BAD_REQUEST, Json(envelope)).into_response();
    };

    let id = request.get("id").and_then(Value::as_i64);

    let Some(method) = request.get("method").and_then(Value::as_str) else {
        let envelope = error_envelope(id, error_codes::INVALID_REQUEST, INVALID_REQUEST_MESSAGE);
        return (StatusCode::BAD_REQUEST, Json(envelope)).into_response();
    };

    if id.is_none() && state.behavior != Behavior::AnswersNotifications {
        return StatusCode::OK.into_response();
    }

    let Some(result) = state.methods.get(method) else {
        let envelope = error_envelope(id, error_codes::METHOD_NOT_FOUND, "Method not found");
        return Json(envelope).into_response();
    };

    let mut envelope = json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "result": result,
    });
    if state.behavior == Behavior::ExtraKey {
        envelope["extra"] = json!(true);
    }
    Json(envelope).into_response()
}

/// Returns the path to a test fixture.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Loads a fixture file from `tests/fixtures`.
#[allow(clippy::missing_panics_doc)]
pub fn load_fixtures(name: &str) -> FixtureSet {
    FixtureLoader::default()
        .load(&fixture_path(name))
        .expect("fixture file should load")
}

/// A local URL nothing is listening on.
#[allow(clippy::missing_panics_doc)]
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let port = listener.local_addr().expect("no local address").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}

/// Runs the `rpc-certify` binary to completion with a clean environment for
/// the variables it reads.
#[allow(clippy::missing_panics_doc)]
pub fn run_cli(args: &[&str]) -> std::process::Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_rpc-certify"))
        .args(args)
        .env_remove("SERVER_ENDPOINT")
        .env_remove("RPC_CERTIFY_FIXTURES")
        .env_remove("RPC_CERTIFY_JOBS")
        .env_remove("RPC_CERTIFY_LOG_LEVEL")
        .output()
        .expect("failed to run rpc-certify")
}
