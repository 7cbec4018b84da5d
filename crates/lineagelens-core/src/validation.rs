//! Cross-reference checks run once while a graph is built.
//!
//! Every check appends to the same issue list; nothing short-circuits, so a
//! failing build reports all of its defects at once.

use std::collections::HashSet;

use crate::catalog::{ColumnLineageIndex, EdgeCatalog, NodeCatalog};
use crate::types::{issue_codes, ColumnCheck, GraphOptions, Issue};

pub(crate) fn validate(
    nodes: &NodeCatalog,
    edges: &EdgeCatalog,
    columns: &ColumnLineageIndex,
    options: &GraphOptions,
    issues: &mut Vec<Issue>,
) {
    check_focal(nodes, issues);
    check_downstream(nodes, edges, issues);
    check_object_edges(nodes, edges, issues);
    check_column_lineage(nodes, columns, options.column_check, issues);
}

fn check_focal(nodes: &NodeCatalog, issues: &mut Vec<Issue>) {
    let focal: Vec<_> = nodes.focal_nodes().collect();
    match focal.as_slice() {
        [] => issues.push(Issue::error(
            issue_codes::MISSING_FOCAL_NODE,
            "no node is marked as focal",
        )),
        [node] => {
            if node.depth_level != 0 {
                issues.push(
                    Issue::error(
                        issue_codes::FOCAL_DEPTH_MISMATCH,
                        format!(
                            "focal node '{}' sits at depth {} instead of 0",
                            node.id, node.depth_level
                        ),
                    )
                    .with_node(&node.id),
                );
            }
        }
        many => {
            let ids: Vec<_> = many.iter().map(|n| n.id.as_str()).collect();
            issues.push(Issue::error(
                issue_codes::MULTIPLE_FOCAL_NODES,
                format!("{} nodes are marked as focal: {}", ids.len(), ids.join(", ")),
            ));
        }
    }
}

fn check_downstream(nodes: &NodeCatalog, edges: &EdgeCatalog, issues: &mut Vec<Issue>) {
    for node in nodes.nodes() {
        for target in &node.downstream {
            if !nodes.contains(target) {
                issues.push(
                    Issue::error(
                        issue_codes::DANGLING_DOWNSTREAM,
                        format!("'{}' lists unknown downstream node '{target}'", node.id),
                    )
                    .with_node(&node.id),
                );
            } else if edges.get_edge(&node.id, target).is_none() {
                issues.push(
                    Issue::info(
                        issue_codes::MISSING_EDGE_METADATA,
                        format!("no object edge describes '{}' -> '{target}'", node.id),
                    )
                    .with_node(&node.id),
                );
            }
        }
    }
}

fn check_object_edges(nodes: &NodeCatalog, edges: &EdgeCatalog, issues: &mut Vec<Issue>) {
    for edge in edges.edges() {
        for endpoint in [&edge.source, &edge.target] {
            if !nodes.contains(endpoint) {
                issues.push(
                    Issue::error(
                        issue_codes::UNKNOWN_EDGE_NODE,
                        format!(
                            "object edge '{}' -> '{}' references unknown node '{endpoint}'",
                            edge.source, edge.target
                        ),
                    )
                    .with_node(endpoint),
                );
            }
        }
    }

    for edge in edges.duplicates() {
        issues.push(
            Issue::warning(
                issue_codes::DUPLICATE_OBJECT_EDGE,
                format!(
                    "object edge '{}' -> '{}' is declared more than once; the first declaration is used",
                    edge.source, edge.target
                ),
            )
            .with_node(&edge.source),
        );
    }
}

fn check_column_lineage(
    nodes: &NodeCatalog,
    columns: &ColumnLineageIndex,
    column_check: ColumnCheck,
    issues: &mut Vec<Issue>,
) {
    let mut unknown_nodes = HashSet::new();
    let mut unknown_columns = HashSet::new();

    for edge in columns.edges() {
        let endpoints = [
            (&edge.source_table, &edge.source_column),
            (&edge.target_table, &edge.target_column),
        ];
        for (table, column) in endpoints {
            let Some(node) = nodes.get_by_id(table) else {
                if unknown_nodes.insert(table.as_str()) {
                    issues.push(
                        Issue::error(
                            issue_codes::UNKNOWN_LINEAGE_NODE,
                            format!("column lineage references unknown node '{table}'"),
                        )
                        .with_node(table),
                    );
                }
                continue;
            };

            if column_check == ColumnCheck::Off || node.has_column(column) {
                continue;
            }
            if !unknown_columns.insert((table.as_str(), column.as_str())) {
                continue;
            }
            let message =
                format!("column lineage references '{table}.{column}', which the node does not declare");
            let issue = if column_check == ColumnCheck::Strict {
                Issue::error(issue_codes::UNKNOWN_COLUMN, message)
            } else {
                Issue::warning(issue_codes::UNKNOWN_COLUMN, message)
            };
            issues.push(issue.with_node(table).with_column(column));
        }
    }
}
