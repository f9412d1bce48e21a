//! API server setup.

use std::net::SocketAddr;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::{DocketError, Result, core::media};

use super::{
    handlers::{health_handler, info_handler, recognize_handler},
    types::ApiState,
};

/// Slack on top of the PDF ceiling for multipart framing overhead.
const BODY_LIMIT_SLACK: usize = 1024 * 1024;

/// Create the API router with all routes configured.
///
/// Public so the router can be nested inside a larger application.
pub fn create_router(state: ApiState) -> Router {
    let body_limit = media::MAX_PDF_BYTES + BODY_LIMIT_SLACK;

    Router::new()
        .route("/recognize", post(recognize_handler))
        .route("/health", get(health_handler))
        .route("/info", get(info_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(body_limit))
                .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// Bind and serve the API until the process is stopped.
///
/// # Errors
///
/// `DocketError::Validation` for an unparseable address; `DocketError::Io`
/// when binding or serving fails.
pub async fn serve(host: &str, port: u16, state: ApiState) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|_| DocketError::validation(format!("invalid listen address {}:{}", host, port)))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "docket API listening");
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
