//! API request handlers.

use axum::{
    Json,
    extract::{Multipart, State},
    http::HeaderMap,
};

use crate::service::traits::Identity;
use crate::types::{RecognitionOutcome, WorkRequest};
use crate::{DocketError, core::media};

use super::{
    error::ApiError,
    types::{ApiState, HealthResponse, InfoResponse, RecognizeResponse},
};

/// Recognize endpoint handler.
///
/// POST /recognize
///
/// Accepts multipart form data with a single `file` field. The file's
/// declared content type is used for validation; when the part carries
/// none, the type is guessed from the file name.
///
/// Requires a bearer credential in the `Authorization` header, resolved
/// through the configured identity provider.
pub async fn recognize_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<RecognizeResponse>, ApiError> {
    let identity = authenticate(&state, &headers).await?;

    let mut request: Option<WorkRequest> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError(DocketError::invalid_input(e.to_string())))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let declared_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError(DocketError::invalid_input(e.to_string())))?;

        let media_type = declared_type
            .or_else(|| {
                file_name
                    .as_deref()
                    .and_then(|name| media::media_type_for_path(std::path::Path::new(name)))
                    .map(str::to_string)
            })
            .ok_or_else(|| ApiError(DocketError::invalid_input("file field carries no content type")))?;

        let mut work = WorkRequest::new(data.to_vec(), media_type);
        if let Some(name) = file_name {
            work = work.with_file_name(name);
        }
        request = Some(work);
    }

    let request = request.ok_or_else(|| ApiError(DocketError::invalid_input("no file provided")))?;

    let response = state.service.process(&identity, request).await?;
    if let RecognitionOutcome::Failure { reason, .. } = &response.outcome {
        return Err(ApiError::vendor_failure(reason));
    }

    Ok(Json(RecognizeResponse::from_service(&response)))
}

/// Health check endpoint handler.
///
/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Server info endpoint handler.
///
/// GET /info
pub async fn info_handler(State(state): State<ApiState>) -> Json<InfoResponse> {
    let config = state.service.recognizer().config();
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: config.model.clone(),
        output_format: config.output_format.clone(),
    })
}

async fn authenticate(state: &ApiState, headers: &HeaderMap) -> Result<Identity, ApiError> {
    let credential = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ApiError(DocketError::Unauthenticated))?;

    Ok(state.identity.verify(credential).await?)
}
