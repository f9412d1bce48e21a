//! Recognition orchestration.
//!
//! One request moves through `Validating → Submitted → Polling → Extracting
//! → Settled`. Validation runs before anything touches the network, so
//! invalid input never spends vendor quota. Vendor-side failures are caught
//! exactly once at this boundary and become a [`RecognitionOutcome::Failure`]
//! carrying the reason; retrying is the caller's decision, never this
//! layer's.

use crate::core::{config::RecognitionConfig, media};
use crate::extract;
use crate::task::TaskClient;
use crate::types::{RecognitionOutcome, WorkRequest};
use crate::Result;
use std::time::Instant;

/// Orchestrates a single recognition: validation, submission, polling,
/// extraction, and outcome classification.
///
/// Holds no per-request state; one `Recognizer` serves any number of
/// concurrent recognitions.
///
/// # Example
///
/// ```no_run
/// use docket::{Recognizer, RecognitionConfig, WorkRequest};
///
/// #[tokio::main]
/// async fn main() -> docket::Result<()> {
///     let mut config = RecognitionConfig::default();
///     config.api_token = Some("token".to_string());
///
///     let recognizer = Recognizer::new(config)?;
///     let payload = std::fs::read("scan.png")?;
///     let outcome = recognizer.recognize(WorkRequest::new(payload, "image/png")).await?;
///     println!("{:?}", outcome);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Recognizer {
    client: TaskClient,
}

impl Recognizer {
    pub fn new(config: RecognitionConfig) -> Result<Self> {
        Ok(Self {
            client: TaskClient::new(config)?,
        })
    }

    /// Build from an existing task client, sharing its HTTP pool.
    pub fn with_client(client: TaskClient) -> Self {
        Self { client }
    }

    pub fn config(&self) -> &RecognitionConfig {
        self.client.config()
    }

    /// Run one recognition to a settled outcome.
    ///
    /// # Errors
    ///
    /// `DocketError::InvalidInput` for an unsupported media type or an
    /// oversized payload, detected locally with zero network calls.
    /// Everything vendor-side settles as `Ok(RecognitionOutcome::Failure)`.
    pub async fn recognize(&self, request: WorkRequest) -> Result<RecognitionOutcome> {
        self.validate(&request)?;

        let file_size = request.size();
        let started = Instant::now();
        tracing::debug!(media_type = %request.media_type, file_size, "submitting recognition");

        let payload = match self.client.submit_and_await(request).await {
            Ok(payload) => payload,
            Err(err) => {
                let elapsed_ms = elapsed_ms(started);
                tracing::warn!(error = %err, elapsed_ms, "recognition failed on the vendor side");
                return Ok(RecognitionOutcome::Failure {
                    reason: err.to_string(),
                    elapsed_ms,
                });
            }
        };

        let extraction = extract::extract_with_fetch(&payload, self.client.http()).await;
        let elapsed_ms = elapsed_ms(started);

        if extraction.is_blank() {
            tracing::debug!(elapsed_ms, "task succeeded but carried no recognizable text");
            return Ok(RecognitionOutcome::NoTextFound { elapsed_ms });
        }

        tracing::debug!(
            elapsed_ms,
            text_length = extraction.text.len(),
            language = extraction.language.as_deref().unwrap_or("unknown"),
            "recognition succeeded"
        );
        Ok(RecognitionOutcome::Success {
            text: extraction.text,
            language: extraction.language,
            elapsed_ms,
        })
    }

    /// Check the allow-list and the configured per-type ceilings.
    pub fn validate(&self, request: &WorkRequest) -> Result<()> {
        let limits = self.config().limits;
        media::validate_work_request_with_ceilings(request, limits.max_image_bytes, limits.max_pdf_bytes)
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
