//! Approval payloads and per-id bulk approval outcomes.

use serde::{Deserialize, Serialize};

/// Body of `POST /bulk-approve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkApprovalRequest {
    /// Ids to approve.
    pub ids: Vec<String>,
    /// User requesting the approval.
    pub approved_by: String,
}

/// One entry of the server's bulk approval report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkApprovalItem {
    /// The rate id this entry reports on.
    pub id: String,
    /// Whether the server approved it.
    pub success: bool,
    /// Failure reason, when `success` is false.
    #[serde(default, alias = "error", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Server response to `POST /bulk-approve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkApprovalResponse {
    /// Per-id results, in any order.
    pub results: Vec<BulkApprovalItem>,
}

/// The outcome for one id of a bulk approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// The server approved the rate.
    Approved,
    /// The server rejected the approval.
    Failed {
        /// Why the approval failed.
        reason: String,
    },
    /// The server's response did not mention this id.
    Unreported,
}

/// Outcome for a single requested id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalResult {
    /// The requested rate id.
    pub id: String,
    /// What happened to it.
    #[serde(flatten)]
    pub status: ApprovalStatus,
}

/// Per-id outcome of a bulk approval, in request order.
///
/// Partial failures keep the successes visible rather than collapsing the
/// whole batch into one error.
///
/// # Example
///
/// ```
/// use hourly_rates::models::{BulkApprovalItem, BulkApprovalOutcome, BulkApprovalResponse};
///
/// let requested = vec!["a".to_string(), "b".to_string()];
/// let response = BulkApprovalResponse {
///     results: vec![
///         BulkApprovalItem { id: "a".to_string(), success: true, message: None },
///         BulkApprovalItem { id: "b".to_string(), success: false, message: Some("locked".to_string()) },
///     ],
/// };
/// let outcome = BulkApprovalOutcome::reconcile(&requested, response);
/// assert_eq!(outcome.approved_ids(), vec!["a"]);
/// assert_eq!(outcome.failed_ids(), vec!["b"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkApprovalOutcome {
    /// One entry per requested id.
    pub results: Vec<ApprovalResult>,
}

impl BulkApprovalOutcome {
    /// Matches the server's report against the requested ids.
    ///
    /// Ids the server did not mention become [`ApprovalStatus::Unreported`];
    /// entries for ids that were never requested are dropped.
    pub fn reconcile(requested: &[String], response: BulkApprovalResponse) -> Self {
        let results = requested
            .iter()
            .map(|id| {
                let status = match response.results.iter().find(|item| &item.id == id) {
                    Some(item) if item.success => ApprovalStatus::Approved,
                    Some(item) => ApprovalStatus::Failed {
                        reason: item
                            .message
                            .clone()
                            .unwrap_or_else(|| "Approval failed".to_string()),
                    },
                    None => ApprovalStatus::Unreported,
                };
                ApprovalResult {
                    id: id.clone(),
                    status,
                }
            })
            .collect();

        Self { results }
    }

    /// Ids the server approved.
    pub fn approved_ids(&self) -> Vec<&str> {
        self.ids_where(|s| matches!(s, ApprovalStatus::Approved))
    }

    /// Ids the server rejected.
    pub fn failed_ids(&self) -> Vec<&str> {
        self.ids_where(|s| matches!(s, ApprovalStatus::Failed { .. }))
    }

    /// Ids with no server report.
    pub fn unreported_ids(&self) -> Vec<&str> {
        self.ids_where(|s| matches!(s, ApprovalStatus::Unreported))
    }

    /// Returns true if every requested id was approved.
    pub fn is_complete_success(&self) -> bool {
        self.results
            .iter()
            .all(|r| r.status == ApprovalStatus::Approved)
    }

    fn ids_where(&self, predicate: impl Fn(&ApprovalStatus) -> bool) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| predicate(&r.status))
            .map(|r| r.id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn item(id: &str, success: bool, message: Option<&str>) -> BulkApprovalItem {
        BulkApprovalItem {
            id: id.to_string(),
            success,
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn test_partial_failure_keeps_successes() {
        let response = BulkApprovalResponse {
            results: vec![item("a", true, None), item("b", false, Some("already active"))],
        };
        let outcome = BulkApprovalOutcome::reconcile(&ids(&["a", "b"]), response);

        assert_eq!(outcome.approved_ids(), vec!["a"]);
        assert_eq!(
            outcome.results[1].status,
            ApprovalStatus::Failed {
                reason: "already active".to_string()
            }
        );
        assert!(!outcome.is_complete_success());
    }

    #[test]
    fn test_results_follow_request_order() {
        let response = BulkApprovalResponse {
            results: vec![item("c", true, None), item("a", true, None)],
        };
        let outcome = BulkApprovalOutcome::reconcile(&ids(&["a", "b", "c"]), response);

        let order: Vec<&str> = outcome.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(outcome.unreported_ids(), vec!["b"]);
    }

    #[test]
    fn test_unrequested_ids_are_dropped() {
        let response = BulkApprovalResponse {
            results: vec![item("a", true, None), item("zzz", true, None)],
        };
        let outcome = BulkApprovalOutcome::reconcile(&ids(&["a"]), response);
        assert_eq!(outcome.results.len(), 1);
        assert!(outcome.is_complete_success());
    }

    #[test]
    fn test_failure_without_message_gets_generic_reason() {
        let response = BulkApprovalResponse {
            results: vec![item("a", false, None)],
        };
        let outcome = BulkApprovalOutcome::reconcile(&ids(&["a"]), response);
        assert_eq!(outcome.failed_ids(), vec!["a"]);
        assert_eq!(
            outcome.results[0].status,
            ApprovalStatus::Failed {
                reason: "Approval failed".to_string()
            }
        );
    }

    #[test]
    fn test_item_accepts_error_alias() {
        let json = r#"{"id": "x", "success": false, "error": "not found"}"#;
        let parsed: BulkApprovalItem = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.message.as_deref(), Some("not found"));
    }

    #[test]
    fn test_result_serializes_flat() {
        let result = ApprovalResult {
            id: "a".to_string(),
            status: ApprovalStatus::Failed {
                reason: "locked".to_string(),
            },
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": "a", "outcome": "failed", "reason": "locked" })
        );
    }
}
