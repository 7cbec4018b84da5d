//! Output formatting modules.

pub mod json;
pub mod mermaid;
pub mod table;

use lineagelens_core::{CatalogError, Issue, LineageGraph, Summary};
use serde::Serialize;

pub use json::format_json;
pub use mermaid::{format_column_neighborhood, format_object_graph};
pub use table::{
    format_edge, format_links, format_node, format_nodes, format_related, format_validation,
};

/// Outcome of `lineagelens validate`, rendered as a table or JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub source: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn from_build(
        source: impl Into<String>,
        result: &Result<LineageGraph, CatalogError>,
    ) -> Self {
        let source = source.into();
        match result {
            Ok(graph) => Self {
                source,
                valid: true,
                summary: Some(graph.summary()),
                issues: graph.issues().to_vec(),
            },
            Err(err) => Self {
                source,
                valid: false,
                summary: None,
                issues: err.issues().to_vec(),
            },
        }
    }
}
