//! Error types for Docket.
//!
//! All fallible operations in the library return [`Result`], which uses
//! [`DocketError`]. The taxonomy follows the recognition pipeline:
//!
//! - `InvalidInput` is raised locally, before any vendor call is made
//! - `Submission`, `Poll`, and `Timeout` come from the task poller
//! - `InsufficientCredits`, `RateLimited`, and `Unauthenticated` come from
//!   the accounting collaborators
//! - `Http`, `Serialization`, and `Io` wrap transport and codec failures
//!   and preserve their sources
//!
//! The recognition orchestrator catches vendor-side errors exactly once and
//! converts them into a `Failure` outcome; they are never retried within a
//! single user-facing call.
use thiserror::Error;

/// Result type alias using `DocketError`.
pub type Result<T> = std::result::Result<T, DocketError>;

/// Main error type for all Docket operations.
#[derive(Debug, Error)]
pub enum DocketError {
    /// Unsupported media type or oversized payload. Detected locally,
    /// before any network call.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The vendor rejected the submission, or its response carried no
    /// task identifier.
    #[error("Submission failed: {message}")]
    Submission {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The vendor reported a terminal failure, or a status query itself
    /// failed at the transport level.
    #[error("Polling failed: {message}")]
    Poll {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The poll budget was exhausted without the task reaching a terminal
    /// state.
    #[error("Task did not complete within {attempts} status checks ({waited_ms} ms)")]
    Timeout { attempts: u32, waited_ms: u64 },

    /// The credit store refused the attempt.
    #[error("Insufficient credits ({remaining} remaining)")]
    InsufficientCredits { remaining: i64 },

    /// Too many attempts inside the rate-limit window.
    #[error("Rate limit exceeded: {count} attempts in the last {window_secs} s")]
    RateLimited { count: u32, window_secs: u64 },

    /// The identity provider could not verify the caller.
    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or parameters.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{0}")]
    Other(String),
}

impl DocketError {
    /// Create an InvalidInput error.
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a Submission error.
    pub fn submission<S: Into<String>>(message: S) -> Self {
        Self::Submission {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Submission error with source.
    pub fn submission_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Submission {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a Poll error.
    pub fn poll<S: Into<String>>(message: S) -> Self {
        Self::Poll {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Poll error with source.
    pub fn poll_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Poll {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a Validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error was produced before any vendor call.
    ///
    /// Local errors map to client-facing 4xx statuses; everything else is a
    /// vendor-side condition reported with a generic retry-later message.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::InsufficientCredits { .. }
                | Self::RateLimited { .. }
                | Self::Unauthenticated
                | Self::Validation { .. }
        )
    }
}
