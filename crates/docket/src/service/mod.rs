//! Recognition service: the orchestrator's billing-aware caller.
//!
//! [`RecognitionService`] wraps a [`Recognizer`] with the accounting policy
//! the orchestrator itself deliberately stays out of: rate limiting, credit
//! checks, and attempt recording. Every terminal outcome (success, no text,
//! failure) is reported to the credit store so the audit trail stays
//! complete; only `Success` deducts a credit.

pub mod memory;
pub mod traits;

use crate::recognition::Recognizer;
use crate::types::{AttemptRecord, RecognitionOutcome, WorkRequest};
use crate::{DocketError, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

pub use traits::{CreditStore, Identity, IdentityProvider, RateLimiter};

/// Maximum attempts per identity inside the rate-limit window.
pub const RATE_LIMIT_MAX_ATTEMPTS: u32 = 5;

/// Trailing rate-limit window.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// Settled response for one recognition request.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceResponse {
    #[serde(flatten)]
    pub outcome: RecognitionOutcome,
    pub remaining_credits: i64,
    pub file_size: usize,
}

/// Billing-aware recognition front door.
pub struct RecognitionService {
    recognizer: Recognizer,
    credits: Arc<dyn CreditStore>,
    rate_limiter: Arc<dyn RateLimiter>,
}

impl RecognitionService {
    pub fn new(recognizer: Recognizer, credits: Arc<dyn CreditStore>, rate_limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            recognizer,
            credits,
            rate_limiter,
        }
    }

    pub fn recognizer(&self) -> &Recognizer {
        &self.recognizer
    }

    /// Process one request for a verified identity.
    ///
    /// Pre-flight checks run before any vendor call, in order: request
    /// validation, rate limit, credit balance. Vendor-side trouble settles
    /// as a `Failure` outcome rather than an error.
    ///
    /// # Errors
    ///
    /// `InvalidInput`, `RateLimited`, and `InsufficientCredits`, all local
    /// and raised before the vendor is contacted.
    pub async fn process(&self, identity: &Identity, request: WorkRequest) -> Result<ServiceResponse> {
        self.recognizer.validate(&request)?;

        let recent = self
            .rate_limiter
            .count_recent_attempts(identity, RATE_LIMIT_WINDOW)
            .await?;
        if recent >= RATE_LIMIT_MAX_ATTEMPTS {
            return Err(DocketError::RateLimited {
                count: recent,
                window_secs: RATE_LIMIT_WINDOW.as_secs(),
            });
        }

        let balance = self.credits.balance(identity).await?;
        if balance <= 0 {
            return Err(DocketError::InsufficientCredits { remaining: balance });
        }

        let file_size = request.size();
        let outcome = self.recognizer.recognize(request).await?;

        let record = AttemptRecord::from_outcome(&outcome, file_size);
        let remaining_credits = match self.credits.record_attempt(identity, &record).await {
            Ok(remaining) => remaining,
            Err(err) => {
                // The caller already holds a settled outcome; a recording
                // failure must not turn it into an error.
                tracing::warn!(identity = %identity.id, error = %err, "failed to record attempt");
                if record.success { balance - 1 } else { balance }
            }
        };

        tracing::info!(
            identity = %identity.id,
            billable = outcome.is_billable(),
            text_length = outcome.text_length(),
            elapsed_ms = outcome.elapsed_ms(),
            remaining_credits,
            "recognition settled"
        );

        Ok(ServiceResponse {
            outcome,
            remaining_credits,
            file_size,
        })
    }
}
