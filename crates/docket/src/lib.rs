//! Docket - Async Document-Recognition Client
//!
//! Docket is a client library for third-party asynchronous document-parsing
//! services. It submits an image or PDF, polls the vendor task until it
//! settles, tolerantly extracts recognized text from the loosely-structured
//! result payload, and classifies the outcome for billing.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use docket::{RecognitionConfig, Recognizer, WorkRequest};
//!
//! #[tokio::main]
//! async fn main() -> docket::Result<()> {
//!     let mut config = RecognitionConfig::default();
//!     config.api_token = Some("vendor-token".to_string());
//!
//!     let recognizer = Recognizer::new(config)?;
//!     let payload = std::fs::read("scan.png")?;
//!     let outcome = recognizer.recognize(WorkRequest::new(payload, "image/png")).await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **Task module** (`task`): vendor submission and fixed-interval status
//!   polling with attempt/deadline budgets
//! - **Extract module** (`extract`): ordered extraction strategies plus a
//!   generic fallback traversal; never fails on unexpected shapes
//! - **Recognition module** (`recognition`): validation, orchestration, and
//!   outcome classification
//! - **Service module** (`service`): billing-aware caller with credit,
//!   rate-limit, and identity collaborator traits
//! - **API module** (`api`, feature `api`): Axum surface mapping the error
//!   taxonomy onto HTTP statuses

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod extract;
pub mod recognition;
pub mod service;
pub mod task;
pub mod types;

#[cfg(feature = "api")]
pub mod api;

pub use error::{DocketError, Result};
pub use types::{AttemptRecord, ExtractionResult, RecognitionOutcome, TaskHandle, WorkRequest};

pub use core::config::{API_TOKEN_ENV, PollBudget, RecognitionConfig, SizeLimits};
pub use core::media::{
    BMP_MIME_TYPE, GIF_MIME_TYPE, JPEG_MIME_TYPE, MAX_IMAGE_BYTES, MAX_PDF_BYTES, PDF_MIME_TYPE, PNG_MIME_TYPE,
    is_supported_media_type, media_type_for_path, size_ceiling, validate_work_request,
    validate_work_request_with_ceilings,
};

pub use extract::{extract, extract_with_fetch};
pub use recognition::Recognizer;
pub use service::{RecognitionService, ServiceResponse};
pub use task::TaskClient;
pub use task::status::{StatusSynonyms, TaskStatus};
