//! Shared test helpers: a scripted stub of the vendor's async task API.
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use docket::RecognitionConfig;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

/// Scripted vendor: a queued submit response, a queue of poll responses
/// (the last one repeats), and call counters.
#[derive(Debug)]
pub struct VendorState {
    pub submit_calls: AtomicUsize,
    pub poll_calls: AtomicUsize,
    pub submit_response: Mutex<(u16, Value)>,
    pub poll_responses: Mutex<VecDeque<(u16, Value)>>,
    pub result_file_body: Mutex<String>,
}

impl Default for VendorState {
    fn default() -> Self {
        Self {
            submit_calls: AtomicUsize::new(0),
            poll_calls: AtomicUsize::new(0),
            submit_response: Mutex::new((200, json!({"task_id": "task-1"}))),
            poll_responses: Mutex::new(VecDeque::from([(200, json!({"status": "pending"}))])),
            result_file_body: Mutex::new(String::new()),
        }
    }
}

impl VendorState {
    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn poll_calls(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }

    pub fn set_submit_response(&self, status: u16, body: Value) {
        *self.submit_response.lock().unwrap() = (status, body);
    }

    pub fn set_poll_responses(&self, responses: Vec<(u16, Value)>) {
        *self.poll_responses.lock().unwrap() = responses.into();
    }

    pub fn set_result_file(&self, body: &str) {
        *self.result_file_body.lock().unwrap() = body.to_string();
    }
}

async fn submit_handler(State(state): State<Arc<VendorState>>) -> impl IntoResponse {
    state.submit_calls.fetch_add(1, Ordering::SeqCst);
    let (status, body) = state.submit_response.lock().unwrap().clone();
    (StatusCode::from_u16(status).unwrap(), Json(body))
}

async fn poll_handler(State(state): State<Arc<VendorState>>) -> impl IntoResponse {
    state.poll_calls.fetch_add(1, Ordering::SeqCst);
    let mut queue = state.poll_responses.lock().unwrap();
    let (status, body) = if queue.len() > 1 {
        queue.pop_front().unwrap()
    } else {
        queue
            .front()
            .cloned()
            .unwrap_or((200, json!({"status": "pending"})))
    };
    (StatusCode::from_u16(status).unwrap(), Json(body))
}

async fn result_file_handler(State(state): State<Arc<VendorState>>) -> String {
    state.result_file_body.lock().unwrap().clone()
}

/// Bind the stub on an ephemeral port and return its base URL.
pub async fn spawn_vendor(state: Arc<VendorState>) -> String {
    // Surface pipeline tracing in test output under RUST_LOG.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let app = Router::new()
        .route("/v1/async/documents/parse", post(submit_handler))
        .route("/v1/task/{task_id}", get(poll_handler))
        .route("/files/result.md", get(result_file_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Configuration pointed at the stub, with a fast poll budget.
pub fn test_config(base_url: &str) -> RecognitionConfig {
    let mut config = RecognitionConfig::default();
    config.base_url = base_url.to_string();
    config.api_token = Some("test-vendor-token".to_string());
    config.polling.max_attempts = 5;
    config.polling.interval_ms = 10;
    config
}

/// A tiny payload that passes validation as a PNG.
pub fn png_payload() -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0]
}
