//! REST API for the recognition pipeline.
//!
//! An Axum-based surface over [`crate::service::RecognitionService`].
//!
//! # Endpoints
//!
//! - `POST /recognize` - Recognize text in an uploaded file (multipart form data)
//! - `GET /health` - Health check endpoint
//! - `GET /info` - Server information
//!
//! # Status mapping
//!
//! Validation errors map to 400, missing credentials to 401, exhausted
//! credits to 403, the rate limit to 429; vendor-side failures map to 502
//! (504 for poll timeouts) with a generic retry-later message.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use docket::{RecognitionConfig, Recognizer};
//! use docket::api::{ApiState, serve};
//! use docket::service::{RecognitionService, memory::{MemoryLedger, StaticTokenProvider}, traits::Identity};
//!
//! #[tokio::main]
//! async fn main() -> docket::Result<()> {
//!     let mut config = RecognitionConfig::default();
//!     config.api_token = Some("vendor-token".to_string());
//!
//!     let ledger = Arc::new(MemoryLedger::new(100));
//!     let service = RecognitionService::new(Recognizer::new(config)?, ledger.clone(), ledger);
//!     let state = ApiState {
//!         service: Arc::new(service),
//!         identity: Arc::new(StaticTokenProvider::new().with_token("client-token", Identity::new("local"))),
//!     };
//!     serve("127.0.0.1", 8000, state).await
//! }
//! ```

mod error;
mod handlers;
mod server;
mod types;

pub use error::ApiError;
pub use server::{create_router, serve};
pub use types::{ApiState, ErrorResponse, HealthResponse, InfoResponse, RecognizeResponse};
