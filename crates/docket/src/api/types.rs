//! API request and response types.

use crate::service::{RecognitionService, ServiceResponse, traits::IdentityProvider};
use crate::types::RecognitionOutcome;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state for the API router.
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<RecognitionService>,
    pub identity: Arc<dyn IdentityProvider>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Server information response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    pub version: String,
    /// Processing model requested from the vendor.
    pub model: String,
    pub output_format: String,
}

/// Settled recognition response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizeResponse {
    /// Whether text was recognized (and a credit deducted).
    pub success: bool,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub remaining_credits: i64,
    pub processing_time_ms: u64,
    pub file_size: usize,
}

impl RecognizeResponse {
    /// Build the wire response for a non-failure outcome.
    pub fn from_service(response: &ServiceResponse) -> Self {
        let (text, language) = match &response.outcome {
            RecognitionOutcome::Success { text, language, .. } => (text.clone(), language.clone()),
            _ => (String::new(), None),
        };
        Self {
            success: response.outcome.is_billable(),
            text,
            language,
            remaining_credits: response.remaining_credits,
            processing_time_ms: response.outcome.elapsed_ms(),
            file_size: response.file_size,
        }
    }
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    pub status_code: u16,
}
