//! Core data model for the recognition pipeline.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A unit of work to submit to the recognition vendor.
///
/// Owns the payload bytes; it is consumed by submission and not retained
/// afterwards. The declared media type and size are checked against the
/// allow-list and per-type ceilings before any network call.
#[derive(Debug, Clone)]
pub struct WorkRequest {
    /// Raw document bytes (image or PDF).
    pub payload: Vec<u8>,
    /// Declared media type, e.g. `image/png` or `application/pdf`.
    pub media_type: String,
    /// File name forwarded to the vendor's multipart form.
    pub file_name: String,
}

impl WorkRequest {
    pub fn new(payload: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            payload,
            media_type: media_type.into(),
            file_name: "upload".to_string(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Declared payload size in bytes.
    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

/// Handle for a submitted vendor task.
///
/// Lives only for the duration of the polling loop; never persisted.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    /// Opaque vendor task identifier.
    pub id: String,
    /// When the submission completed.
    pub submitted_at: Instant,
}

impl TaskHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            submitted_at: Instant::now(),
        }
    }
}

/// Text recovered from a vendor result payload.
///
/// Derived once by the extractor and immutable afterwards. Empty text is a
/// valid result, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Recovered text, possibly empty.
    pub text: String,
    /// Detected language tag, when the payload carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl ExtractionResult {
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            language: None,
        }
    }

    /// Whether the recovered text is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Final classification of a recognition attempt.
///
/// This is what the orchestrator returns to its caller and what downstream
/// billing and logging consume: only `Success` is billable; `NoTextFound`
/// and `Failure` are recorded but never deduct credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecognitionOutcome {
    Success {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        elapsed_ms: u64,
    },
    NoTextFound {
        elapsed_ms: u64,
    },
    Failure {
        reason: String,
        elapsed_ms: u64,
    },
}

impl RecognitionOutcome {
    /// Whether this outcome deducts a usage credit.
    pub fn is_billable(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Length of the recovered text, zero for non-success outcomes.
    pub fn text_length(&self) -> usize {
        match self {
            Self::Success { text, .. } => text.len(),
            _ => 0,
        }
    }

    /// Detected language, when the outcome carries one.
    pub fn language(&self) -> Option<&str> {
        match self {
            Self::Success { language, .. } => language.as_deref(),
            _ => None,
        }
    }

    /// Wall-clock time from submission to settlement.
    pub fn elapsed_ms(&self) -> u64 {
        match self {
            Self::Success { elapsed_ms, .. } | Self::NoTextFound { elapsed_ms } | Self::Failure { elapsed_ms, .. } => {
                *elapsed_ms
            }
        }
    }
}

/// Usage record handed to the credit store for every terminal outcome.
///
/// Failed and no-text attempts are recorded with zero text length so the
/// audit trail stays complete; only successful records are billable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub success: bool,
    pub text_length: usize,
    pub file_size: usize,
    pub processing_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl AttemptRecord {
    /// Build the record for a settled outcome.
    pub fn from_outcome(outcome: &RecognitionOutcome, file_size: usize) -> Self {
        Self {
            success: outcome.is_billable(),
            text_length: outcome.text_length(),
            file_size,
            processing_time_ms: outcome.elapsed_ms(),
            language: outcome.language().map(str::to_string),
        }
    }
}
