//! Vendor task submission and polling.
//!
//! The vendor exposes a classic async-task API: `POST` a multipart
//! submission, receive a task identifier, then `GET` the task until it
//! reaches a terminal state. [`TaskClient`] wraps both calls and the
//! fixed-interval wait loop between them.
//!
//! Two quirks of the wire protocol are handled here rather than leaking to
//! callers: the task identifier arrives under either of two field names
//! (`task_id` or `id`), and the status vocabulary varies by API version
//! (normalized through [`status::StatusSynonyms`]).
//!
//! # Example
//!
//! ```no_run
//! use docket::{RecognitionConfig, WorkRequest, task::TaskClient};
//!
//! #[tokio::main]
//! async fn main() -> docket::Result<()> {
//!     let mut config = RecognitionConfig::default();
//!     config.api_token = Some("token".to_string());
//!
//!     let client = TaskClient::new(config)?;
//!     let payload = std::fs::read("scan.png")?;
//!     let body = client
//!         .submit_and_await(WorkRequest::new(payload, "image/png"))
//!         .await?;
//!     println!("terminal payload: {}", body);
//!     Ok(())
//! }
//! ```

pub mod status;

use crate::core::config::RecognitionConfig;
use crate::types::{TaskHandle, WorkRequest};
use crate::{DocketError, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use status::TaskStatus;

/// Submission endpoint, relative to the configured base URL.
const SUBMIT_PATH: &str = "/v1/async/documents/parse";

/// Status endpoint prefix, relative to the configured base URL.
const TASK_PATH: &str = "/v1/task";

/// Field names under which the vendor has been observed to return the task
/// identifier.
const TASK_ID_FIELDS: &[&str] = &["task_id", "id"];

/// HTTP client for the vendor's async document-parse API.
///
/// Holds no per-task state; a single client can serve any number of
/// concurrent recognitions.
#[derive(Debug, Clone)]
pub struct TaskClient {
    http: reqwest::Client,
    config: Arc<RecognitionConfig>,
    token: String,
}

impl TaskClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// `DocketError::Validation` when the configuration is invalid or no
    /// API token can be resolved.
    pub fn new(config: RecognitionConfig) -> Result<Self> {
        config.validate()?;
        let token = config.resolve_token()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
            token,
        })
    }

    pub fn config(&self) -> &RecognitionConfig {
        &self.config
    }

    /// The underlying HTTP client, shared with the result-file fetch path.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Submit a work request and wait for the task's terminal payload.
    pub async fn submit_and_await(&self, request: WorkRequest) -> Result<Value> {
        let handle = self.submit(request).await?;
        self.await_result(&handle).await
    }

    /// Submit a work request, returning the vendor task handle.
    ///
    /// # Errors
    ///
    /// `DocketError::Submission` when the vendor rejects the upload or the
    /// response carries no task identifier; `DocketError::Http` on
    /// transport failure.
    pub async fn submit(&self, request: WorkRequest) -> Result<TaskHandle> {
        let url = format!("{}{}", self.base_url(), SUBMIT_PATH);
        let file_part = reqwest::multipart::Part::bytes(request.payload)
            .file_name(request.file_name)
            .mime_str(&request.media_type)
            .map_err(|e| DocketError::submission_with_source("media type not usable in multipart form", e))?;
        let form = reqwest::multipart::Form::new()
            .text("model", self.config.model.clone())
            .part("file", file_part)
            .text("include_image", bool_field(self.config.include_image))
            .text("include_image_base64", bool_field(self.config.include_image_base64))
            .text("output_format", self.config.output_format.clone());

        tracing::debug!(url = %url, model = %self.config.model, "submitting parse task");
        let response = self.http.post(&url).bearer_auth(&self.token).multipart(form).send().await?;

        let http_status = response.status();
        if !http_status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = %http_status, body = %body, "vendor rejected submission");
            return Err(DocketError::submission(format!("vendor returned HTTP {}", http_status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| DocketError::submission_with_source("submission response was not valid JSON", e))?;

        let task_id = extract_task_id(&body)
            .ok_or_else(|| DocketError::submission("submission response carried no task identifier"))?;

        tracing::debug!(task_id = %task_id, "task submitted");
        Ok(TaskHandle::new(task_id))
    }

    /// Poll a submitted task until it reaches a terminal state, within the
    /// configured budget.
    ///
    /// Unrecognized status strings count as still pending. Only "still
    /// pending" is retried: a status query that fails at the transport
    /// level, or returns a non-success HTTP status, fails immediately.
    ///
    /// # Errors
    ///
    /// `DocketError::Poll` when the vendor reports a terminal failure or a
    /// status query fails; `DocketError::Timeout` when the attempt budget
    /// (or the optional wall-clock deadline) is exhausted.
    pub async fn await_result(&self, handle: &TaskHandle) -> Result<Value> {
        let budget = self.config.polling;
        let deadline = budget.deadline();

        for attempt in 1..=budget.max_attempts {
            let body = self.query_status(&handle.id).await?;
            let raw = body.get("status").and_then(Value::as_str).unwrap_or("unknown");
            let task_status = self.config.synonyms.normalize(raw);
            tracing::debug!(
                task_id = %handle.id,
                attempt,
                max_attempts = budget.max_attempts,
                status = ?task_status,
                raw = %raw,
                "polled task status"
            );

            match task_status {
                TaskStatus::Success => return Ok(body),
                TaskStatus::Failed | TaskStatus::Cancelled => {
                    return Err(DocketError::poll(failure_message(&body)));
                }
                TaskStatus::Pending | TaskStatus::Unknown => {}
            }

            if let Some(deadline) = deadline {
                if handle.submitted_at.elapsed() + budget.interval() >= deadline {
                    return Err(self.timeout(handle, attempt));
                }
            }
            if attempt < budget.max_attempts {
                sleep(budget.interval()).await;
            }
        }

        Err(self.timeout(handle, budget.max_attempts))
    }

    async fn query_status(&self, task_id: &str) -> Result<Value> {
        let url = format!("{}{}/{}", self.base_url(), TASK_PATH, task_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let http_status = response.status();
        if !http_status.is_success() {
            return Err(DocketError::poll(format!("status query returned HTTP {}", http_status)));
        }

        response
            .json()
            .await
            .map_err(|e| DocketError::poll_with_source("status response was not valid JSON", e))
    }

    fn timeout(&self, handle: &TaskHandle, attempts: u32) -> DocketError {
        DocketError::Timeout {
            attempts,
            waited_ms: handle.submitted_at.elapsed().as_millis() as u64,
        }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }
}

fn bool_field(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Pull the task identifier out of a submission response, trying each known
/// field name in order.
fn extract_task_id(body: &Value) -> Option<String> {
    TASK_ID_FIELDS
        .iter()
        .filter_map(|field| body.get(field))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            // Some API versions return numeric identifiers.
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// Best-effort failure message from a terminal-failure body.
fn failure_message(body: &Value) -> String {
    body.pointer("/error/message")
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "vendor reported task failure".to_string())
}
