//! Configuration loading and management.
//!
//! [`RecognitionConfig`] covers everything the pipeline needs to talk to the
//! vendor: endpoint, credentials, fixed processing parameters, poll budget,
//! and the status synonym table. It can be loaded from TOML or JSON files or
//! created programmatically.

use crate::task::status::StatusSynonyms;
use crate::{DocketError, Result, core::media};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable consulted when `api_token` is unset.
pub const API_TOKEN_ENV: &str = "DOCKET_API_TOKEN";

/// Attempt/interval budget for the polling loop.
///
/// The default timeout is `max_attempts * interval_ms`, which is sensitive
/// to per-call latency variance; `deadline_ms` adds an optional wall-clock
/// bound that stops the loop even when attempts remain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PollBudget {
    /// Maximum number of status queries before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed sleep between status queries, in milliseconds. Vendor task
    /// completion times are short and bounded, so there is no backoff.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Optional wall-clock deadline measured from submission, in
    /// milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,
}

impl Default for PollBudget {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
            deadline_ms: None,
        }
    }
}

impl PollBudget {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

/// Per-class payload ceilings, in bytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SizeLimits {
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
    #[serde(default = "default_max_pdf_bytes")]
    pub max_pdf_bytes: usize,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            max_image_bytes: default_max_image_bytes(),
            max_pdf_bytes: default_max_pdf_bytes(),
        }
    }
}

/// Main configuration for the recognition pipeline.
///
/// # Example
///
/// ```rust
/// use docket::RecognitionConfig;
///
/// let mut config = RecognitionConfig::default();
/// config.api_token = Some("token".to_string());
/// config.polling.max_attempts = 10;
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionConfig {
    /// Vendor API base URL, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token for the vendor API. Falls back to the
    /// `DOCKET_API_TOKEN` environment variable when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Processing model requested on submission.
    #[serde(default = "default_model")]
    pub model: String,

    /// Requested output format for the parsed document.
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Ask the vendor to include auxiliary image data in the result.
    #[serde(default = "default_true")]
    pub include_image: bool,

    /// Ask for the auxiliary image data as base64.
    #[serde(default = "default_true")]
    pub include_image_base64: bool,

    /// Per-request HTTP timeout for individual vendor calls, in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    #[serde(default)]
    pub polling: PollBudget,

    #[serde(default)]
    pub synonyms: StatusSynonyms,

    #[serde(default)]
    pub limits: SizeLimits,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            model: default_model(),
            output_format: default_output_format(),
            include_image: true,
            include_image_base64: true,
            http_timeout_secs: default_http_timeout_secs(),
            polling: PollBudget::default(),
            synonyms: StatusSynonyms::default(),
            limits: SizeLimits::default(),
        }
    }
}

impl RecognitionConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| DocketError::validation(format!("invalid TOML config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, dispatching on its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            other => Err(DocketError::validation(format!(
                "unsupported config extension {:?} (expected .toml or .json)",
                other
            ))),
        }
    }

    /// Resolve the vendor API token, consulting the environment as a
    /// fallback.
    pub fn resolve_token(&self) -> Result<String> {
        if let Some(token) = &self.api_token {
            if !token.trim().is_empty() {
                return Ok(token.clone());
            }
        }
        match std::env::var(API_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(DocketError::validation(format!(
                "no vendor API token configured (set api_token or the {} environment variable)",
                API_TOKEN_ENV
            ))),
        }
    }

    /// Validate field combinations that serde defaults cannot catch.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(DocketError::validation("base_url must not be empty"));
        }
        if self.polling.max_attempts == 0 {
            return Err(DocketError::validation("polling.max_attempts must be at least 1"));
        }
        if self.limits.max_image_bytes == 0 || self.limits.max_pdf_bytes == 0 {
            return Err(DocketError::validation("size limits must be non-zero"));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "https://ai.gitee.com".to_string()
}

fn default_model() -> String {
    "PaddleOCR-VL".to_string()
}

fn default_output_format() -> String {
    "md".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_attempts() -> u32 {
    30
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_max_image_bytes() -> usize {
    media::MAX_IMAGE_BYTES
}

fn default_max_pdf_bytes() -> usize {
    media::MAX_PDF_BYTES
}
