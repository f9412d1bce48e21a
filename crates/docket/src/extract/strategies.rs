//! Typed extraction strategies over the vendor result payload.
//!
//! Each strategy is a pure function `(&Value) -> Option<Vec<Fragment>>`
//! probing one known payload shape. The shapes and their priority order come
//! straight from observed vendor responses; the dot-path tables make the
//! "try many possible field names" pattern declarative so new vendor
//! variants are a one-line addition.

use serde_json::Value;

/// A single recovered candidate of document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Inline text taken directly from the payload.
    Text(String),
    /// URL of an external result file whose raw contents are the text.
    /// Resolved by the async extraction entry point.
    RemoteFile(String),
}

/// A named, prioritized extraction strategy.
pub type Strategy = fn(&Value) -> Option<Vec<Fragment>>;

/// Strategies in priority order; the first producing usable fragments wins.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("page-text", page_text),
    ("segments", segments),
    ("result-file", result_file),
    ("single-field", single_field),
];

const PAGE_TEXT_PATH: &str = "output.text_result";
const SEGMENTS_PATH: &str = "output.segments";
const RESULT_FILE_PATH: &str = "output.file_url";

/// Text-bearing fields probed on each segment, in order.
const SEGMENT_TEXT_FIELDS: &[&str] = &["text", "content"];

/// Single-field fallbacks, in decreasing specificity.
const SINGLE_FIELD_PATHS: &[&str] = &[
    "output.text",
    "output.content",
    "output.markdown",
    "result.text",
    "text",
];

/// Known language locations, in priority order.
const LANGUAGE_PATHS: &[&str] = &[
    "output.language",
    "output.detected_language",
    "result.language",
    "language",
];

/// Walk a dot-separated path through nested objects.
pub fn value_at<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.').try_fold(root, |value, key| value.get(key))
}

fn non_empty_string_at(root: &Value, path: &str) -> Option<String> {
    value_at(root, path)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Dominant page-text field. When present, it alone constitutes the text.
fn page_text(root: &Value) -> Option<Vec<Fragment>> {
    non_empty_string_at(root, PAGE_TEXT_PATH).map(|s| vec![Fragment::Text(s)])
}

/// Segment array: one fragment per segment, in array order. Segments
/// without a text-bearing field contribute an empty line so the original
/// ordering survives the join.
fn segments(root: &Value) -> Option<Vec<Fragment>> {
    let items = value_at(root, SEGMENTS_PATH)?.as_array()?;
    if items.is_empty() {
        return None;
    }
    let texts: Vec<String> = items.iter().map(segment_text).collect();
    if texts.iter().all(|t| t.trim().is_empty()) {
        return None;
    }
    Some(texts.into_iter().map(Fragment::Text).collect())
}

fn segment_text(segment: &Value) -> String {
    SEGMENT_TEXT_FIELDS
        .iter()
        .filter_map(|field| segment.get(field))
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
        .unwrap_or("")
        .to_string()
}

/// Reference to an external result file.
fn result_file(root: &Value) -> Option<Vec<Fragment>> {
    non_empty_string_at(root, RESULT_FILE_PATH).map(|url| vec![Fragment::RemoteFile(url)])
}

/// Descending list of single-field fallbacks.
fn single_field(root: &Value) -> Option<Vec<Fragment>> {
    SINGLE_FIELD_PATHS
        .iter()
        .find_map(|path| non_empty_string_at(root, path))
        .map(|s| vec![Fragment::Text(s)])
}

/// First non-empty language value among the known paths, falling back to a
/// `language` field on any segment.
pub fn detect_language(root: &Value) -> Option<String> {
    for path in LANGUAGE_PATHS {
        if let Some(language) = non_empty_string_at(root, path) {
            return Some(language);
        }
    }
    value_at(root, SEGMENTS_PATH)?.as_array()?.iter().find_map(|segment| {
        segment
            .get("language")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    })
}
