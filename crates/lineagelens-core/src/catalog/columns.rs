//! Column-lineage index.
//!
//! Edges are indexed in both directions by `(node id, column name)` so that
//! upstream, downstream, and related-column queries cost time proportional to
//! the number of matching edges rather than the size of the edge list.

use std::collections::HashMap;

#[cfg(feature = "tracing")]
use tracing::trace;

use crate::types::{ColumnLineageEdge, ColumnLink, RelatedColumns};

type EndpointIndex = HashMap<String, HashMap<String, Vec<usize>>>;

/// Column-lineage edges indexed by source and by target endpoint.
///
/// Each posting list holds edge positions in ascending order, so every query
/// answers in edge-declaration order.
#[derive(Debug, Clone, Default)]
pub struct ColumnLineageIndex {
    edges: Vec<ColumnLineageEdge>,
    by_source: EndpointIndex,
    by_target: EndpointIndex,
}

impl ColumnLineageIndex {
    pub fn new(edges: Vec<ColumnLineageEdge>) -> Self {
        let mut by_source = EndpointIndex::new();
        let mut by_target = EndpointIndex::new();

        for (idx, edge) in edges.iter().enumerate() {
            by_source
                .entry(edge.source_table.clone())
                .or_default()
                .entry(edge.source_column.clone())
                .or_default()
                .push(idx);
            by_target
                .entry(edge.target_table.clone())
                .or_default()
                .entry(edge.target_column.clone())
                .or_default()
                .push(idx);
        }

        #[cfg(feature = "tracing")]
        trace!(
            edges = edges.len(),
            source_nodes = by_source.len(),
            target_nodes = by_target.len(),
            "indexed column lineage"
        );

        Self {
            edges,
            by_source,
            by_target,
        }
    }

    pub fn edges(&self) -> &[ColumnLineageEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Direct sources of `(item_id, column)`: one link per edge targeting it.
    ///
    /// Duplicate edges produce duplicate links. Unknown endpoints yield an
    /// empty list.
    pub fn get_upstream_columns(&self, item_id: &str, column: &str) -> Vec<ColumnLink> {
        postings(&self.by_target, item_id, column)
            .iter()
            .map(|&idx| {
                let edge = &self.edges[idx];
                ColumnLink::new(
                    &edge.source_table,
                    &edge.source_column,
                    edge.transform_type.clone(),
                )
            })
            .collect()
    }

    /// Direct targets of `(item_id, column)`: one link per edge sourced from it.
    pub fn get_downstream_columns(&self, item_id: &str, column: &str) -> Vec<ColumnLink> {
        postings(&self.by_source, item_id, column)
            .iter()
            .map(|&idx| {
                let edge = &self.edges[idx];
                ColumnLink::new(
                    &edge.target_table,
                    &edge.target_column,
                    edge.transform_type.clone(),
                )
            })
            .collect()
    }

    /// Columns one hop away in either direction, grouped by node.
    ///
    /// Nodes appear in the order the edge list first mentions them relative to
    /// the selection. Multi-hop neighbors are never included.
    pub fn find_related_columns(&self, item_id: &str, column: &str) -> RelatedColumns {
        let outgoing = postings(&self.by_source, item_id, column);
        let incoming = postings(&self.by_target, item_id, column);

        let mut related = RelatedColumns::new();
        let (mut out, mut inc) = (0, 0);
        while out < outgoing.len() || inc < incoming.len() {
            let next_out = outgoing.get(out).copied().unwrap_or(usize::MAX);
            let next_in = incoming.get(inc).copied().unwrap_or(usize::MAX);

            // A self-loop sits in both lists at the same position.
            if next_out <= next_in {
                let edge = &self.edges[next_out];
                related
                    .entry(edge.target_table.clone())
                    .or_default()
                    .insert(edge.target_column.clone());
                out += 1;
            }
            if next_in <= next_out {
                let edge = &self.edges[next_in];
                related
                    .entry(edge.source_table.clone())
                    .or_default()
                    .insert(edge.source_column.clone());
                inc += 1;
            }
        }
        related
    }
}

fn postings<'a>(index: &'a EndpointIndex, item_id: &str, column: &str) -> &'a [usize] {
    index
        .get(item_id)
        .and_then(|columns| columns.get(column))
        .map(Vec::as_slice)
        .unwrap_or_default()
}
