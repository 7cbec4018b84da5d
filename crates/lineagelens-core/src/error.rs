//! Error types for loading and building lineage graphs.
//!
//! # Error Handling Strategy
//!
//! This crate uses two complementary error handling patterns:
//!
//! - [`CatalogError`]: Fatal errors that prevent a graph from being built. Every
//!   defect found during a build is collected before the build fails.
//!
//! - [`crate::types::Issue`]: Findings collected during the build. Error-severity
//!   issues become a [`CatalogError::Invalid`]; warnings and infos are kept on
//!   the built graph and can be inspected with `LineageGraph::issues`.
//!
//! Queries against a built graph never fail. A missing node, column, or edge is
//! an empty result, not an error.

use crate::types::{Issue, IssueCount, Severity};

/// Error encountered while loading or building a lineage graph.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The source document is not valid JSON or does not match the source format.
    #[error("invalid lineage source: {0}")]
    Parse(#[from] serde_json::Error),

    /// The source parsed, but contains defects.
    #[error("{}", describe_defects(.issues))]
    Invalid {
        /// Every issue found during the build, including non-fatal ones.
        issues: Vec<Issue>,
    },
}

impl CatalogError {
    /// Builds an [`CatalogError::Invalid`] when `issues` contains at least one defect.
    pub(crate) fn from_issues(issues: Vec<Issue>) -> Result<Vec<Issue>, Self> {
        if issues.iter().any(Issue::is_error) {
            Err(Self::Invalid { issues })
        } else {
            Ok(issues)
        }
    }

    /// All issues carried by this error. Empty for parse errors.
    pub fn issues(&self) -> &[Issue] {
        match self {
            Self::Parse(_) => &[],
            Self::Invalid { issues } => issues,
        }
    }

    /// Only the error-severity issues that caused the build to fail.
    pub fn defects(&self) -> impl Iterator<Item = &Issue> {
        self.issues().iter().filter(|issue| issue.is_error())
    }
}

fn describe_defects(issues: &[Issue]) -> String {
    let count = IssueCount::from_issues(issues);
    let mut message = format!(
        "lineage source has {} defect{}",
        count.errors,
        if count.errors == 1 { "" } else { "s" }
    );
    for issue in issues.iter().filter(|i| i.severity == Severity::Error) {
        message.push_str("\n  ");
        message.push_str(&issue.to_string());
    }
    message
}
