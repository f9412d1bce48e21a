//! Tolerant text extraction from vendor result payloads.
//!
//! The vendor's result schema is not contractually stable across document
//! types; an image scan, a table, and a multi-page PDF can all come back in
//! different shapes. Extraction is therefore a best-effort heuristic, never
//! a strict parse: known shapes are probed in priority order
//! ([`strategies`]), and when none match, a generic traversal of the whole
//! payload recovers whatever prose-looking strings it carries
//! ([`traverse`]). Absence of recognizable text is a valid result, not an
//! error: [`extract`] is total and never panics on unexpected shapes.
//!
//! # Example
//!
//! ```rust
//! use docket::extract::extract;
//! use serde_json::json;
//!
//! let payload = json!({"output": {"segments": [{"text": "A"}, {"text": "B"}]}});
//! let result = extract(&payload);
//! assert_eq!(result.text, "A\nB");
//! ```

pub mod strategies;
pub mod traverse;

use crate::types::ExtractionResult;
use crate::{DocketError, Result};
use indexmap::IndexSet;
use serde_json::Value;

pub use strategies::{Fragment, detect_language};

/// Extract text from a result payload. Pure: no side effects, identical
/// output for identical input.
///
/// A payload whose only text lives behind an external result-file URL
/// yields whatever the remaining strategies and the fallback traversal
/// recover; use [`extract_with_fetch`] to resolve the file.
pub fn extract(value: &Value) -> ExtractionResult {
    for (name, strategy) in strategies::STRATEGIES {
        let Some(fragments) = strategy(value) else { continue };
        let parts: Vec<String> = fragments
            .into_iter()
            .filter_map(|fragment| match fragment {
                Fragment::Text(s) => Some(s),
                Fragment::RemoteFile(_) => None,
            })
            .collect();
        if let Some(text) = assemble(parts) {
            tracing::debug!(strategy = name, "extraction strategy matched");
            return ExtractionResult {
                text,
                language: detect_language(value),
            };
        }
    }
    fallback(value)
}

/// Extract text, resolving an external result-file reference when the
/// payload carries one.
///
/// This is the component's only network side effect. A failed fetch is
/// logged and treated as a missed strategy; the remaining strategies and
/// the fallback traversal still run, so this function never fails either.
pub async fn extract_with_fetch(value: &Value, http: &reqwest::Client) -> ExtractionResult {
    for (name, strategy) in strategies::STRATEGIES {
        let Some(fragments) = strategy(value) else { continue };
        let mut parts = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            match fragment {
                Fragment::Text(s) => parts.push(s),
                Fragment::RemoteFile(url) => match fetch_result_file(http, &url).await {
                    Ok(body) => parts.push(body),
                    Err(err) => {
                        tracing::warn!(url = %url, error = %err, "failed to fetch result file");
                    }
                },
            }
        }
        if let Some(text) = assemble(parts) {
            tracing::debug!(strategy = name, "extraction strategy matched");
            return ExtractionResult {
                text,
                language: detect_language(value),
            };
        }
    }
    fallback(value)
}

/// Join a strategy's fragments, or report a miss when none carry text.
fn assemble(parts: Vec<String>) -> Option<String> {
    if parts.iter().any(|p| !p.trim().is_empty()) {
        Some(parts.join("\n"))
    } else {
        None
    }
}

/// Generic traversal plus generic field probes, deduplicated in first-seen
/// order and joined with blank lines.
fn fallback(value: &Value) -> ExtractionResult {
    let mut found = IndexSet::new();
    traverse::collect_candidate_strings(value, &mut found);
    traverse::collect_generic_fields(value, &mut found);

    let text = found
        .iter()
        .filter(|s| traverse::keep_fragment(s.as_str()))
        .cloned()
        .collect::<Vec<_>>()
        .join("\n\n");

    ExtractionResult {
        text,
        language: detect_language(value),
    }
}

async fn fetch_result_file(http: &reqwest::Client, url: &str) -> Result<String> {
    let response = http.get(url).send().await?;
    if !response.status().is_success() {
        return Err(DocketError::poll(format!(
            "result file fetch returned HTTP {}",
            response.status()
        )));
    }
    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use serde_json::json;

    #[test]
    fn test_dominant_page_text_wins() {
        let payload = json!({"output": {"text_result": "Hello"}});
        let result = extract(&payload);
        assert_eq!(result.text, "Hello");
        assert_eq!(result.language, None);
    }

    #[test]
    fn test_segments_joined_with_newlines() {
        let payload = json!({"output": {"segments": [{"text": "A"}, {"text": "B"}]}});
        assert_eq!(extract(&payload).text, "A\nB");
    }

    #[test]
    fn test_strategies_short_circuit_in_order() {
        // A payload matching several shapes at once settles on the first.
        let payload = json!({
            "output": {
                "text_result": "page text",
                "segments": [{"text": "segment text"}],
                "content": "single field",
            },
            "text": "top level",
        });
        assert_eq!(extract(&payload).text, "page text");

        let payload = json!({
            "output": {
                "segments": [{"text": "segment text"}],
                "content": "single field",
            },
        });
        assert_eq!(extract(&payload).text, "segment text");

        let payload = json!({"output": {"content": "single field"}});
        assert_eq!(extract(&payload).text, "single field");
    }

    #[test]
    fn test_base64_blob_never_surfaces() {
        let blob = base64::engine::general_purpose::STANDARD.encode(vec![3u8; 256]);
        let payload = json!({"output": {"image_base64": blob}});
        let result = extract(&payload);
        assert!(result.is_blank());
    }

    #[test]
    fn test_fallback_traversal_recovers_unknown_shapes() {
        let payload = json!({
            "pages": [
                {"blocks": [{"value": "First paragraph of the scan"}]},
                {"blocks": [{"value": "Second paragraph of the scan"}]},
            ],
        });
        let result = extract(&payload);
        assert_eq!(result.text, "First paragraph of the scan\n\nSecond paragraph of the scan");
    }

    #[test]
    fn test_fallback_drops_field_name_like_fragments() {
        let payload = json!({"kind": "ocr", "body": "an actual sentence of text"});
        let result = extract(&payload);
        assert_eq!(result.text, "an actual sentence of text");
    }

    #[test]
    fn test_fallback_merges_generic_fields() {
        // "markdown" sits under a key the traversal also visits; the set
        // dedups it. A blank-line join separates distinct fragments.
        let payload = json!({"markdown": "# Receipt\n\nTotal: 12.50", "meta": {"note": "scanned at branch office"}});
        let result = extract(&payload);
        assert!(result.text.contains("# Receipt"));
        assert!(result.text.contains("scanned at branch office"));
        assert_eq!(result.text.matches("# Receipt").count(), 1);
    }

    #[test]
    fn test_extractor_is_idempotent() {
        let payload = json!({
            "status": "success",
            "output": {"segments": [{"text": "A", "language": "en"}, {"text": "B"}]},
        });
        let first = extract(&payload);
        let second = extract(&payload);
        assert_eq!(first, second);
    }

    #[test]
    fn test_language_detection_rides_along() {
        let payload = json!({"output": {"text_result": "Bonjour", "language": "fr"}});
        let result = extract(&payload);
        assert_eq!(result.language.as_deref(), Some("fr"));
    }

    #[test]
    fn test_never_fails_on_hostile_shapes() {
        for payload in [
            json!(null),
            json!(42),
            json!([1, 2, 3]),
            json!(""),
            json!({"output": null}),
            json!({"output": {"segments": [null, 17, {"text": null}]}}),
        ] {
            let result = extract(&payload);
            assert!(result.is_blank(), "expected blank result for {payload}");
        }
    }

    #[test]
    fn test_remote_file_ignored_by_pure_extract() {
        let payload = json!({"output": {"file_url": "https://cdn.example/result.md"}});
        let result = extract(&payload);
        assert!(result.is_blank());
    }
}
