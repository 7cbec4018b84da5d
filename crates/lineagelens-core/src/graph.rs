//! The query facade over a built lineage graph.

#[cfg(feature = "tracing")]
use tracing::{debug, info_span};

use crate::catalog::{flatten, ColumnLineageIndex, EdgeCatalog, NodeCatalog};
use crate::error::CatalogError;
use crate::types::{
    ColumnLink, GraphOptions, Issue, IssueCount, LineageSource, Node, ObjectEdge, RelatedColumns,
    Summary,
};
use crate::validation::validate;

/// An immutable, validated lineage graph.
///
/// Built once from a [`LineageSource`]; every query afterwards is a read. A
/// graph is `Send + Sync` and can be shared behind an `Arc` without locking.
///
/// Queries are total: an unknown node, column, or edge yields `None` or an
/// empty collection. Column queries do not check that the column is declared
/// on its node; that check happens once at build time (see
/// [`GraphOptions::column_check`](crate::types::GraphOptions)).
#[derive(Debug, Clone)]
pub struct LineageGraph {
    nodes: NodeCatalog,
    edges: EdgeCatalog,
    columns: ColumnLineageIndex,
    issues: Vec<Issue>,
}

impl LineageGraph {
    /// Flattens, indexes, and validates `source`.
    ///
    /// Every issue is collected before deciding: if any is an error, the
    /// build fails with [`CatalogError::Invalid`] carrying all of them.
    pub fn build(source: LineageSource, options: &GraphOptions) -> Result<Self, CatalogError> {
        #[cfg(feature = "tracing")]
        let _span = info_span!("build_lineage_graph", items = source.item_count()).entered();

        let (nodes, mut issues) = flatten(&source.depths);
        let (nodes, index_issues) = NodeCatalog::index(nodes);
        issues.extend(index_issues);

        let edges = EdgeCatalog::new(source.object_edges);
        let columns = ColumnLineageIndex::new(source.column_lineage);

        validate(&nodes, &edges, &columns, options, &mut issues);

        #[cfg(feature = "tracing")]
        {
            let count = IssueCount::from_issues(&issues);
            debug!(
                nodes = nodes.len(),
                object_edges = edges.len(),
                column_edges = columns.len(),
                errors = count.errors,
                warnings = count.warnings,
                infos = count.infos,
                "lineage graph validated"
            );
        }

        let issues = CatalogError::from_issues(issues)?;
        Ok(Self {
            nodes,
            edges,
            columns,
            issues,
        })
    }

    /// Parses a [`LineageSource`] from JSON and builds it.
    pub fn from_json(json: &str, options: &GraphOptions) -> Result<Self, CatalogError> {
        let source = LineageSource::from_json(json)?;
        Self::build(source, options)
    }

    /// All nodes in flattening order (depth, then group, then item).
    pub fn list_nodes(&self) -> &[Node] {
        self.nodes.nodes()
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.get_by_id(id)
    }

    /// Execution metadata for the ordered pair `(source, target)`.
    pub fn get_object_edge(&self, source: &str, target: &str) -> Option<&ObjectEdge> {
        self.edges.get_edge(source, target)
    }

    pub fn object_edges(&self) -> &[ObjectEdge] {
        self.edges.edges()
    }

    pub fn get_upstream_columns(&self, node_id: &str, column: &str) -> Vec<ColumnLink> {
        self.columns.get_upstream_columns(node_id, column)
    }

    pub fn get_downstream_columns(&self, node_id: &str, column: &str) -> Vec<ColumnLink> {
        self.columns.get_downstream_columns(node_id, column)
    }

    /// Direct neighbors of a column in both directions, grouped by node.
    pub fn get_related_columns(&self, node_id: &str, column: &str) -> RelatedColumns {
        self.columns.find_related_columns(node_id, column)
    }

    pub fn focal_node(&self) -> Option<&Node> {
        self.nodes.focal_nodes().next()
    }

    pub fn nodes_at_depth(&self, level: i32) -> Vec<&Node> {
        self.nodes.at_depth(level).collect()
    }

    /// Nodes listed in `id`'s `downstream`, in declaration order.
    pub fn downstream_nodes(&self, id: &str) -> Vec<&Node> {
        self.nodes.downstream_of(id)
    }

    /// Nodes whose `downstream` lists `id`.
    pub fn upstream_nodes(&self, id: &str) -> Vec<&Node> {
        self.nodes.upstream_of(id)
    }

    /// Non-fatal issues found while building (warnings and infos).
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn summary(&self) -> Summary {
        let depth_range = self.nodes.depth_range();
        Summary {
            node_count: self.nodes.len(),
            depth_count: self.nodes.depth_count(),
            min_depth: depth_range.map(|(min, _)| min),
            max_depth: depth_range.map(|(_, max)| max),
            object_edge_count: self.edges.len(),
            column_edge_count: self.columns.len(),
            focal_node: self.focal_node().map(|node| node.id.clone()),
            issue_count: IssueCount::from_issues(&self.issues),
        }
    }
}
