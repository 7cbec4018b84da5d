//! Common types shared between the source format and query results.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An issue found while building the lineage graph (error, warning, or info).
///
/// Error-severity issues are defects: any one of them aborts the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Severity level
    pub severity: Severity,

    /// Machine-readable issue code
    pub code: String,

    /// Human-readable message
    pub message: String,

    /// Optional: node the issue relates to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,

    /// Optional: column the issue relates to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl Issue {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn info(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
            node_id: None,
            column: None,
        }
    }

    pub fn with_node(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Counts of issues by severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct IssueCount {
    /// Number of error-level issues
    pub errors: usize,
    /// Number of warning-level issues
    pub warnings: usize,
    /// Number of info-level issues
    pub infos: usize,
}

impl IssueCount {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut count = Self::default();
        for issue in issues {
            match issue.severity {
                Severity::Error => count.errors += 1,
                Severity::Warning => count.warnings += 1,
                Severity::Info => count.infos += 1,
            }
        }
        count
    }
}

/// Summary statistics for a built lineage graph.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Total number of flattened nodes
    pub node_count: usize,

    /// Number of distinct depth levels that contain at least one node
    pub depth_count: usize,

    /// Most upstream depth level (negative), if any nodes exist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_depth: Option<i32>,

    /// Most downstream depth level (positive), if any nodes exist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<i32>,

    /// Total number of object-level edges
    pub object_edge_count: usize,

    /// Total number of column-level lineage edges
    pub column_edge_count: usize,

    /// Id of the focal node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focal_node: Option<String>,

    /// Issue counts by severity
    pub issue_count: IssueCount,
}

/// Machine-readable issue codes.
pub mod issue_codes {
    pub const DUPLICATE_NODE_ID: &str = "DUPLICATE_NODE_ID";
    pub const DANGLING_DOWNSTREAM: &str = "DANGLING_DOWNSTREAM";
    pub const UNKNOWN_LINEAGE_NODE: &str = "UNKNOWN_LINEAGE_NODE";
    pub const UNKNOWN_EDGE_NODE: &str = "UNKNOWN_EDGE_NODE";
    pub const MALFORMED_NODE: &str = "MALFORMED_NODE";
    pub const DUPLICATE_COLUMN: &str = "DUPLICATE_COLUMN";
    pub const MISSING_FOCAL_NODE: &str = "MISSING_FOCAL_NODE";
    pub const MULTIPLE_FOCAL_NODES: &str = "MULTIPLE_FOCAL_NODES";
    pub const FOCAL_DEPTH_MISMATCH: &str = "FOCAL_DEPTH_MISMATCH";
    pub const UNKNOWN_COLUMN: &str = "UNKNOWN_COLUMN";
    pub const DUPLICATE_OBJECT_EDGE: &str = "DUPLICATE_OBJECT_EDGE";
    pub const MISSING_EDGE_METADATA: &str = "MISSING_EDGE_METADATA";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_builders() {
        let issue = Issue::error(issue_codes::DUPLICATE_COLUMN, "duplicate column 'ID'")
            .with_node("orders")
            .with_column("ID");

        assert!(issue.is_error());
        assert_eq!(issue.node_id.as_deref(), Some("orders"));
        assert_eq!(issue.column.as_deref(), Some("ID"));
        assert_eq!(
            issue.to_string(),
            "[DUPLICATE_COLUMN] duplicate column 'ID'"
        );
    }

    #[test]
    fn test_issue_serialization_skips_empty_context() {
        let issue = Issue::warning(issue_codes::DUPLICATE_OBJECT_EDGE, "dup");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["severity"], "warning");
        assert!(json.get("nodeId").is_none());
        assert!(json.get("column").is_none());
    }

    #[test]
    fn test_issue_count_from_issues() {
        let issues = vec![
            Issue::error("A", "a"),
            Issue::warning("B", "b"),
            Issue::warning("C", "c"),
            Issue::info("D", "d"),
        ];
        let count = IssueCount::from_issues(&issues);
        assert_eq!(count.errors, 1);
        assert_eq!(count.warnings, 2);
        assert_eq!(count.infos, 1);
    }
}
