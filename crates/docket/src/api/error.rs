//! API error mapping.
//!
//! Local errors (validation, auth, quota, rate limit) surface with their
//! own messages and client-error statuses. Everything vendor-side maps to a
//! gateway status with a generic retry-later message: raw vendor error
//! payloads never reach API clients.

use crate::DocketError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// Generic client-facing message for vendor-side failures.
const RETRY_LATER: &str = "Recognition service is temporarily unavailable, please try again later";

/// Error wrapper implementing `IntoResponse` for the API surface.
#[derive(Debug)]
pub struct ApiError(pub DocketError);

impl From<DocketError> for ApiError {
    fn from(err: DocketError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// A settled `Failure` outcome, reported as a gateway error.
    pub fn vendor_failure(reason: &str) -> Self {
        Self(DocketError::poll(reason.to_string()))
    }

    fn status_and_body(&self) -> (StatusCode, ErrorResponse) {
        let (status, error_type, message) = match &self.0 {
            DocketError::InvalidInput(_) | DocketError::Validation { .. } => {
                (StatusCode::BAD_REQUEST, "validation_error", self.0.to_string())
            }
            DocketError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "Missing or invalid credentials".to_string(),
            ),
            DocketError::InsufficientCredits { .. } => {
                (StatusCode::FORBIDDEN, "insufficient_credits", self.0.to_string())
            }
            DocketError::RateLimited { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, "rate_limited", self.0.to_string())
            }
            DocketError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "timeout", RETRY_LATER.to_string()),
            _ => (StatusCode::BAD_GATEWAY, "vendor_error", RETRY_LATER.to_string()),
        };

        (
            status,
            ErrorResponse {
                error_type: error_type.to_string(),
                message,
                status_code: status.as_u16(),
            },
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if status.is_server_error() {
            tracing::error!(error = %self.0, status = %status, "request failed");
        } else {
            tracing::debug!(error = %self.0, status = %status, "request rejected");
        }
        (status, Json(body)).into_response()
    }
}
