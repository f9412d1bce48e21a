//! Task status normalization.
//!
//! The vendor's status vocabulary is observed, not documented: different API
//! versions spell success as `success`, `succeeded`, or `finished`, and the
//! failure family is just as loose. Raw strings are therefore normalized
//! case-insensitively through a synonym table that ships with the observed
//! minimum sets and can be extended from configuration without touching the
//! polling loop.

use serde::{Deserialize, Serialize};

/// Normalized state of a vendor task.
///
/// `Unknown` covers unrecognized status strings; the poller treats it the
/// same as `Pending` and keeps waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Success,
    Failed,
    Cancelled,
    Unknown,
}

impl TaskStatus {
    /// Whether no further transition can occur from this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Cancelled)
    }
}

/// Case-insensitive synonym table mapping vendor status strings onto
/// [`TaskStatus`].
///
/// Defaults carry the minimum sets observed across vendor API versions.
/// Extra synonyms can be appended via configuration; matching lowercases
/// both sides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSynonyms {
    #[serde(default = "default_success")]
    pub success: Vec<String>,
    #[serde(default = "default_failed")]
    pub failed: Vec<String>,
    #[serde(default = "default_cancelled")]
    pub cancelled: Vec<String>,
    #[serde(default = "default_pending")]
    pub pending: Vec<String>,
}

fn default_success() -> Vec<String> {
    to_owned(&["success", "succeeded", "finished", "completed"])
}

fn default_failed() -> Vec<String> {
    to_owned(&["failed", "failure", "error"])
}

fn default_cancelled() -> Vec<String> {
    to_owned(&["cancelled", "canceled"])
}

fn default_pending() -> Vec<String> {
    to_owned(&["pending", "queued", "waiting", "running", "processing", "in_progress"])
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for StatusSynonyms {
    fn default() -> Self {
        Self {
            success: default_success(),
            failed: default_failed(),
            cancelled: default_cancelled(),
            pending: default_pending(),
        }
    }
}

impl StatusSynonyms {
    /// Normalize a raw vendor status string.
    pub fn normalize(&self, raw: &str) -> TaskStatus {
        let needle = raw.trim().to_lowercase();
        if needle.is_empty() {
            return TaskStatus::Unknown;
        }
        if self.matches(&self.success, &needle) {
            TaskStatus::Success
        } else if self.matches(&self.failed, &needle) {
            TaskStatus::Failed
        } else if self.matches(&self.cancelled, &needle) {
            TaskStatus::Cancelled
        } else if self.matches(&self.pending, &needle) {
            TaskStatus::Pending
        } else {
            TaskStatus::Unknown
        }
    }

    fn matches(&self, synonyms: &[String], needle: &str) -> bool {
        synonyms.iter().any(|s| s.to_lowercase() == needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(TaskStatus::Success.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(TaskStatus::Cancelled.is_terminal());
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::Unknown.is_terminal());
    }

    #[test]
    fn test_normalize_success_synonyms() {
        let table = StatusSynonyms::default();
        for raw in ["success", "SUCCESS", "Succeeded", "finished", "Completed"] {
            assert_eq!(table.normalize(raw), TaskStatus::Success, "raw = {raw}");
        }
    }

    #[test]
    fn test_normalize_failure_family() {
        let table = StatusSynonyms::default();
        assert_eq!(table.normalize("failed"), TaskStatus::Failed);
        assert_eq!(table.normalize("ERROR"), TaskStatus::Failed);
        assert_eq!(table.normalize("cancelled"), TaskStatus::Cancelled);
        assert_eq!(table.normalize("canceled"), TaskStatus::Cancelled);
    }

    #[test]
    fn test_normalize_pending_and_unknown() {
        let table = StatusSynonyms::default();
        assert_eq!(table.normalize("queued"), TaskStatus::Pending);
        assert_eq!(table.normalize("IN_PROGRESS"), TaskStatus::Pending);
        assert_eq!(table.normalize("warming_up"), TaskStatus::Unknown);
        assert_eq!(table.normalize(""), TaskStatus::Unknown);
        assert_eq!(table.normalize("  "), TaskStatus::Unknown);
    }

    #[test]
    fn test_table_is_extensible() {
        let mut table = StatusSynonyms::default();
        table.success.push("done".to_string());
        assert_eq!(table.normalize("DONE"), TaskStatus::Success);
        // The baked-in sets still apply.
        assert_eq!(table.normalize("finished"), TaskStatus::Success);
    }

    #[test]
    fn test_deserialization_fills_defaults() {
        let table: StatusSynonyms = serde_json::from_str(r#"{"success": ["ok"]}"#).unwrap();
        assert_eq!(table.normalize("ok"), TaskStatus::Success);
        // Omitted groups keep their defaults.
        assert_eq!(table.normalize("failed"), TaskStatus::Failed);
        // An overridden group replaces its default set.
        assert_eq!(table.normalize("finished"), TaskStatus::Unknown);
    }
}
