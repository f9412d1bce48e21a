//! Generic fallback traversal of unrecognized payload shapes.
//!
//! When no known-shape strategy matches, every string leaf in the payload is
//! a candidate fragment, except leaves that plainly carry binary data:
//! children of image/thumbnail/preview/file keys, implausibly long strings,
//! and base64-looking blobs.

use crate::extract::strategies::value_at;
use indexmap::IndexSet;
use serde_json::Value;

/// Sanity ceiling on a single fragment, in characters.
pub const MAX_FRAGMENT_CHARS: usize = 20_000;

/// Recursion guard against pathologically nested payloads.
const MAX_DEPTH: usize = 32;

/// Key substrings that conventionally hold binary or image data.
const BINARY_KEY_MARKERS: &[&str] = &["image", "thumbnail", "preview", "file", "base64"];

/// Generic top-level and second-level fields that sometimes carry the whole
/// document even in otherwise unrecognized payloads.
const GENERIC_FIELD_PATHS: &[&str] = &[
    "markdown",
    "text",
    "content",
    "output",
    "output.markdown",
    "output.text",
    "output.content",
];

/// Collect qualifying string leaves into an order-preserving deduplicated
/// set.
pub fn collect_candidate_strings(value: &Value, found: &mut IndexSet<String>) {
    walk(value, 0, found);
}

fn walk(value: &Value, depth: usize, found: &mut IndexSet<String>) {
    if depth >= MAX_DEPTH {
        return;
    }
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if is_binary_key(key) {
                    continue;
                }
                walk(child, depth + 1, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, depth + 1, found);
            }
        }
        Value::String(s) => {
            if qualifies(s) {
                found.insert(s.clone());
            }
        }
        _ => {}
    }
}

/// Merge the generic field probes into the same collected set.
pub fn collect_generic_fields(root: &Value, found: &mut IndexSet<String>) {
    for path in GENERIC_FIELD_PATHS {
        if let Some(s) = value_at(root, path).and_then(Value::as_str) {
            if qualifies(s) {
                found.insert(s.to_string());
            }
        }
    }
}

fn is_binary_key(key: &str) -> bool {
    let key = key.to_lowercase();
    BINARY_KEY_MARKERS.iter().any(|marker| key.contains(marker))
}

fn qualifies(s: &str) -> bool {
    !s.trim().is_empty() && s.chars().count() < MAX_FRAGMENT_CHARS && !looks_like_base64(s)
}

/// Heuristic for base64-encoded binary: a long unbroken run of base64
/// alphabet characters. Real prose of that length carries whitespace.
pub fn looks_like_base64(s: &str) -> bool {
    const MIN_BLOB_LEN: usize = 64;
    s.len() >= MIN_BLOB_LEN
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
}

/// Final filter on collected fragments: drop very short fragments with no
/// whitespace, which are usually field names rather than prose.
pub fn keep_fragment(s: &str) -> bool {
    s.chars().count() > 12 || s.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use serde_json::json;

    #[test]
    fn test_collect_skips_binary_keys() {
        let blob = base64::engine::general_purpose::STANDARD.encode(vec![0u8; 96]);
        let root = json!({
            "summary": "A scanned receipt from the corner shop",
            "image_base64": blob,
            "thumbnail": {"data": "not binary but under a binary key"},
            "preview_url": "https://cdn.example/p.png",
        });

        let mut found = IndexSet::new();
        collect_candidate_strings(&root, &mut found);
        assert_eq!(found.len(), 1);
        assert!(found.contains("A scanned receipt from the corner shop"));
    }

    #[test]
    fn test_collect_dedups_preserving_order() {
        let root = json!({
            "a": "first fragment here",
            "b": ["second fragment here", "first fragment here"],
            "c": {"d": "third fragment here"},
        });
        let mut found = IndexSet::new();
        collect_candidate_strings(&root, &mut found);
        let fragments: Vec<&String> = found.iter().collect();
        assert_eq!(
            fragments,
            vec!["first fragment here", "second fragment here", "third fragment here"]
        );
    }

    #[test]
    fn test_collect_caps_fragment_length() {
        let huge = "x ".repeat(MAX_FRAGMENT_CHARS);
        let root = json!({"a": huge, "b": "kept text"});
        let mut found = IndexSet::new();
        collect_candidate_strings(&root, &mut found);
        assert_eq!(found.len(), 1);
        assert!(found.contains("kept text"));
    }

    #[test]
    fn test_looks_like_base64() {
        let blob = base64::engine::general_purpose::STANDARD.encode(vec![7u8; 80]);
        assert!(looks_like_base64(&blob));
        assert!(!looks_like_base64("short"));
        assert!(!looks_like_base64(
            "A long sentence with spaces is never mistaken for an encoded binary blob, however long it runs."
        ));
        // Long but broken by padding-free whitespace
        assert!(!looks_like_base64(&format!("{} {}", "a".repeat(40), "b".repeat(40))));
    }

    #[test]
    fn test_keep_fragment_filter() {
        assert!(!keep_fragment("md"));
        assert!(!keep_fragment("text_result"));
        assert!(keep_fragment("two words"));
        assert!(keep_fragment("averylongtokenthatpasses"));
    }

    #[test]
    fn test_collect_generic_fields_merges() {
        let root = json!({"markdown": "# Title with content", "output": {"text": "inner text here"}});
        let mut found = IndexSet::new();
        collect_generic_fields(&root, &mut found);
        assert!(found.contains("# Title with content"));
        assert!(found.contains("inner text here"));
        // "output" itself is an object, not a string leaf
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_depth_guard_terminates() {
        let mut nested = json!("leaf text at the bottom");
        for _ in 0..MAX_DEPTH + 8 {
            nested = json!({ "level": nested });
        }
        let mut found = IndexSet::new();
        collect_candidate_strings(&nested, &mut found);
        // The leaf sits below the depth guard; the point is that the walk
        // returns rather than overflowing.
        assert!(found.is_empty());
    }
}
