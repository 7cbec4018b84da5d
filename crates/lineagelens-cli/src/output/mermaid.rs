//! Mermaid diagram generation.

use lineagelens_core::{ColumnLink, Node};
use std::collections::{BTreeMap, HashSet};

/// Format nodes as an object-level flowchart, one subgraph per depth level.
///
/// Only downstream references between two listed nodes become edges, so a
/// depth-filtered listing draws no arrows leaving the slice.
pub fn format_object_graph(nodes: &[&Node]) -> String {
    let mut lines = vec!["flowchart LR".to_string()];

    let mut by_depth: BTreeMap<i32, Vec<&Node>> = BTreeMap::new();
    for &node in nodes {
        by_depth.entry(node.depth_level).or_default().push(node);
    }

    for (depth, members) in &by_depth {
        lines.push(format!("    subgraph depth_{}[\"Depth {depth}\"]", depth_key(*depth)));
        for node in members {
            lines.push(format!("        {}", node_shape(node)));
        }
        lines.push("    end".to_string());
    }

    let listed: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
    let mut edges: HashSet<(&str, &str)> = HashSet::new();
    for node in nodes {
        for target in &node.downstream {
            if listed.contains(target.as_str()) && edges.insert((node.id.as_str(), target.as_str())) {
                lines.push(format!(
                    "    {} --> {}",
                    sanitize_id(&node.id),
                    sanitize_id(target)
                ));
            }
        }
    }

    lines.join("\n")
}

/// Format the one-hop neighborhood of a column, with transforms as edge labels.
///
/// Aggregating transforms are drawn dotted.
pub fn format_column_neighborhood(
    node_id: &str,
    column: &str,
    upstream: &[ColumnLink],
    downstream: &[ColumnLink],
) -> String {
    let mut lines = vec!["flowchart LR".to_string()];
    let mut declared: HashSet<String> = HashSet::new();

    let center = column_id(node_id, column);
    lines.push(format!(
        "    {center}((\"{}\"))",
        escape_label(&format!("{node_id}.{column}"))
    ));
    declared.insert(center.clone());

    let mut edges: HashSet<String> = HashSet::new();
    for (link, incoming) in upstream
        .iter()
        .map(|link| (link, true))
        .chain(downstream.iter().map(|link| (link, false)))
    {
        let other = column_id(&link.item_id, &link.column_name);
        if declared.insert(other.clone()) {
            lines.push(format!(
                "    {other}[\"{}\"]",
                escape_label(&format!("{}.{}", link.item_id, link.column_name))
            ));
        }

        let (from, to) = if incoming {
            (&other, &center)
        } else {
            (&center, &other)
        };
        let arrow = if link.transform_type.is_aggregation() {
            "-.->"
        } else {
            "-->"
        };
        let edge = format!(
            "    {from} {arrow}|{}| {to}",
            escape_label(link.transform_type.as_str())
        );
        if edges.insert(edge.clone()) {
            lines.push(edge);
        }
    }

    lines.join("\n")
}

fn node_shape(node: &Node) -> String {
    let id = sanitize_id(&node.id);
    let label = escape_label(&format!("{} ({})", node.name, node.obj_type()));
    if node.is_focal {
        format!("{id}([\"{label}\"])")
    } else {
        format!("{id}[\"{label}\"]")
    }
}

fn depth_key(depth: i32) -> String {
    if depth < 0 {
        format!("m{}", depth.unsigned_abs())
    } else {
        depth.to_string()
    }
}

fn column_id(node_id: &str, column: &str) -> String {
    sanitize_id(&format!("{node_id}__{column}"))
}

/// Sanitize node ID for Mermaid (remove special chars)
fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Escape label for Mermaid
fn escape_label(label: &str) -> String {
    label.replace('"', "\\\"").replace('\n', " ")
}
