//! Node catalog: flattening the depth tree and indexing nodes by id.

use std::collections::{HashMap, HashSet};

#[cfg(feature = "tracing")]
use tracing::trace;

use crate::error::CatalogError;
use crate::types::{
    issue_codes, AlertKind, Column, ColumnRole, DepthLevel, Issue, Node, NodeAlert, NodeKind,
    NodeLocation, SourceGroup, SourceItem,
};

/// Flattens a depth/group/schema/item tree into one [`Node`] per item.
///
/// Database-style groups attach `database` and `schema` context to each item;
/// platform-style groups attach `platform`. Output order is depth-major, then
/// group-major, then item-major, matching declaration order.
///
/// Items whose descriptor lists do not match their `objType` are still
/// flattened, and the mismatch is reported as a [`issue_codes::MALFORMED_NODE`]
/// issue.
pub fn flatten(depths: &[DepthLevel]) -> (Vec<Node>, Vec<Issue>) {
    let mut nodes = Vec::new();
    let mut issues = Vec::new();

    for depth in depths {
        for group in &depth.groups {
            match group {
                SourceGroup::Database(db) => {
                    for schema in &db.schemas {
                        for item in &schema.items {
                            let location = NodeLocation::Database {
                                database: db.database.clone(),
                                schema: schema.name.clone(),
                            };
                            nodes.push(flatten_item(item, depth.level, location, &mut issues));
                        }
                    }
                }
                SourceGroup::Platform(platform) => {
                    for item in &platform.items {
                        let location = NodeLocation::Platform {
                            platform: platform.name.clone(),
                        };
                        nodes.push(flatten_item(item, depth.level, location, &mut issues));
                    }
                }
            }
        }
    }

    #[cfg(feature = "tracing")]
    trace!(
        nodes = nodes.len(),
        depths = depths.len(),
        "flattened lineage source"
    );

    (nodes, issues)
}

fn flatten_item(
    item: &SourceItem,
    depth_level: i32,
    location: NodeLocation,
    issues: &mut Vec<Issue>,
) -> Node {
    let columns = with_role(item.columns.as_deref(), ColumnRole::Column);
    let kind = match NodeKind::with_columns(item.obj_type, columns) {
        Some(kind) => {
            if item.features.is_some() || item.outputs.is_some() {
                issues.push(
                    Issue::error(
                        issue_codes::MALFORMED_NODE,
                        format!(
                            "{} '{}' declares features or outputs; only models carry them",
                            item.obj_type, item.id
                        ),
                    )
                    .with_node(&item.id),
                );
            }
            kind
        }
        None => {
            if item.columns.is_some() {
                issues.push(
                    Issue::error(
                        issue_codes::MALFORMED_NODE,
                        format!(
                            "model '{}' declares columns; models carry features and outputs",
                            item.id
                        ),
                    )
                    .with_node(&item.id),
                );
            }
            NodeKind::Model {
                features: with_role(item.features.as_deref(), ColumnRole::Feature),
                outputs: with_role(item.outputs.as_deref(), ColumnRole::Output),
            }
        }
    };

    let mut node = Node::new(&item.id, &item.name, depth_level, location, kind);
    node.description = item.description.clone();
    node.is_focal = item.is_focal;
    node.downstream = item.downstream.clone();
    node.owner = item.owner.clone();
    node.created_at = item.created_at;
    node.tags = item.tags.clone();
    node.data_quality = item.data_quality;
    node.row_count = item.row_count;
    node.icon = item.icon.clone();
    node.alerts = collect_alerts(item);

    report_duplicate_columns(&node, issues);
    node
}

fn with_role(columns: Option<&[Column]>, role: ColumnRole) -> Vec<Column> {
    columns
        .unwrap_or_default()
        .iter()
        .map(|column| column.clone().with_role(role))
        .collect()
}

fn collect_alerts(item: &SourceItem) -> Vec<NodeAlert> {
    let flags = [
        (item.has_error, AlertKind::Error, &item.error_message),
        (item.has_warning, AlertKind::Warning, &item.warning_message),
        (
            item.has_upstream_issues,
            AlertKind::UpstreamIssue,
            &item.upstream_issue_message,
        ),
    ];

    flags
        .into_iter()
        .filter(|(raised, _, _)| *raised)
        .map(|(_, kind, message)| NodeAlert {
            kind,
            message: message.clone(),
        })
        .collect()
}

fn report_duplicate_columns(node: &Node, issues: &mut Vec<Issue>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for column in node.columns() {
        if !seen.insert(column.name.as_str()) && reported.insert(column.name.as_str()) {
            issues.push(
                Issue::error(
                    issue_codes::DUPLICATE_COLUMN,
                    format!("node '{}' declares column '{}' more than once", node.id, column.name),
                )
                .with_node(&node.id)
                .with_column(&column.name),
            );
        }
    }
}

/// Flattened nodes indexed by id.
///
/// Nodes keep their flattening order. The catalog also keeps the reverse of
/// every node's `downstream` list so upstream neighbors resolve without a scan.
#[derive(Debug, Clone, Default)]
pub struct NodeCatalog {
    nodes: Vec<Node>,
    by_id: HashMap<String, usize>,
    upstream: HashMap<String, Vec<usize>>,
}

impl NodeCatalog {
    /// Builds a uniqueness-checked id index.
    ///
    /// Fails with a [`issue_codes::DUPLICATE_NODE_ID`] defect for every id that
    /// appears more than once. Duplicates are never silently overwritten.
    pub fn build_index(nodes: Vec<Node>) -> Result<Self, CatalogError> {
        let (catalog, issues) = Self::index(nodes);
        CatalogError::from_issues(issues)?;
        Ok(catalog)
    }

    /// Indexes nodes and reports duplicate ids instead of failing.
    ///
    /// The first node with a given id is the one the index resolves to.
    pub(crate) fn index(nodes: Vec<Node>) -> (Self, Vec<Issue>) {
        let mut issues = Vec::new();
        let mut by_id = HashMap::with_capacity(nodes.len());
        let mut upstream: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, node) in nodes.iter().enumerate() {
            if by_id.contains_key(&node.id) {
                issues.push(
                    Issue::error(
                        issue_codes::DUPLICATE_NODE_ID,
                        format!(
                            "node id '{}' is declared more than once (depth {})",
                            node.id, node.depth_level
                        ),
                    )
                    .with_node(&node.id),
                );
                continue;
            }
            by_id.insert(node.id.clone(), idx);

            for target in &node.downstream {
                upstream.entry(target.clone()).or_default().push(idx);
            }
        }

        let catalog = Self {
            nodes,
            by_id,
            upstream,
        };
        (catalog, issues)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Node> {
        self.by_id.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// All nodes in flattening order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes marked as focal, in flattening order.
    pub fn focal_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.is_focal)
    }

    pub fn at_depth(&self, level: i32) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(move |node| node.depth_level == level)
    }

    /// Resolved `downstream` neighbors of `id`. Unresolvable ids are skipped.
    pub fn downstream_of(&self, id: &str) -> Vec<&Node> {
        self.get_by_id(id)
            .map(|node| {
                node.downstream
                    .iter()
                    .filter_map(|target| self.get_by_id(target))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Nodes that list `id` in their `downstream`, in flattening order.
    pub fn upstream_of(&self, id: &str) -> Vec<&Node> {
        self.upstream
            .get(id)
            .map(|indices| indices.iter().map(|&idx| &self.nodes[idx]).collect())
            .unwrap_or_default()
    }

    /// Lowest and highest depth level, or `None` for an empty catalog.
    pub fn depth_range(&self) -> Option<(i32, i32)> {
        let min = self.nodes.iter().map(|n| n.depth_level).min()?;
        let max = self.nodes.iter().map(|n| n.depth_level).max()?;
        Some((min, max))
    }

    /// Number of distinct depth levels holding at least one node.
    pub fn depth_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| n.depth_level)
            .collect::<HashSet<_>>()
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DatabaseGroup, ObjType, PlatformGroup, SourceSchema};

    fn depth(level: i32, groups: Vec<SourceGroup>) -> DepthLevel {
        DepthLevel {
            id: None,
            level,
            label: None,
            direction: None,
            groups,
        }
    }

    fn database(name: &str, schemas: Vec<(&str, Vec<SourceItem>)>) -> SourceGroup {
        SourceGroup::Database(DatabaseGroup {
            id: None,
            database: name.to_string(),
            icon: None,
            schemas: schemas
                .into_iter()
                .map(|(schema, items)| SourceSchema {
                    id: None,
                    name: schema.to_string(),
                    items,
                })
                .collect(),
        })
    }

    fn platform(name: &str, items: Vec<SourceItem>) -> SourceGroup {
        SourceGroup::Platform(PlatformGroup {
            id: None,
            name: name.to_string(),
            icon: None,
            items,
        })
    }

    fn table(id: &str) -> SourceItem {
        SourceItem::new(id, id.to_uppercase(), ObjType::Table)
            .with_columns(vec![Column::new("ID", "INTEGER")])
    }

    #[test]
    fn test_flatten_attaches_location_and_depth() {
        let depths = vec![
            depth(
                -1,
                vec![database(
                    "ACME_PROD",
                    vec![("RAW", vec![table("a"), table("b")]), ("STAGING", vec![table("c")])],
                )],
            ),
            depth(1, vec![platform("Looker", vec![SourceItem::new("d", "D", ObjType::Dashboard)])]),
        ];

        let (nodes, issues) = flatten(&depths);
        assert!(issues.is_empty());

        let ids: Vec<_> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);

        assert_eq!(nodes[2].depth_level, -1);
        assert_eq!(
            nodes[2].location,
            NodeLocation::Database {
                database: "ACME_PROD".to_string(),
                schema: "STAGING".to_string()
            }
        );
        assert_eq!(nodes[3].depth_level, 1);
        assert_eq!(
            nodes[3].location,
            NodeLocation::Platform {
                platform: "Looker".to_string()
            }
        );
        assert_eq!(nodes[3].columns().count(), 0);
    }

    #[test]
    fn test_flatten_tags_model_descriptors() {
        let mut model = SourceItem::new("m", "M", ObjType::Model);
        model.features = Some(vec![Column::new("recency", "NUMERIC")]);
        model.outputs = Some(vec![Column::new("score", "NUMERIC")]);

        let (nodes, issues) = flatten(&[depth(2, vec![platform("ML", vec![model])])]);
        assert!(issues.is_empty());

        let roles: Vec<_> = nodes[0].columns().map(|c| c.role).collect();
        assert_eq!(roles, vec![ColumnRole::Feature, ColumnRole::Output]);
    }

    #[test]
    fn test_flatten_reports_malformed_descriptors() {
        let mut model = SourceItem::new("m", "M", ObjType::Model);
        model.columns = Some(vec![Column::new("x", "INT")]);
        let mut view = SourceItem::new("v", "V", ObjType::View);
        view.features = Some(Vec::new());

        let (nodes, issues) = flatten(&[depth(0, vec![platform("P", vec![model, view])])]);
        assert_eq!(nodes.len(), 2);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.code == issue_codes::MALFORMED_NODE));
        assert_eq!(issues[0].node_id.as_deref(), Some("m"));
        assert_eq!(issues[1].node_id.as_deref(), Some("v"));
    }

    #[test]
    fn test_flatten_rejects_empty_descriptor_lists_on_either_side() {
        let mut model = SourceItem::new("m", "M", ObjType::Model);
        model.columns = Some(Vec::new());
        let mut raw = SourceItem::new("t", "T", ObjType::Table);
        raw.outputs = Some(Vec::new());

        let (_, issues) = flatten(&[depth(0, vec![platform("P", vec![model, raw])])]);
        let flagged: Vec<_> = issues
            .iter()
            .filter(|i| i.code == issue_codes::MALFORMED_NODE)
            .map(|i| i.node_id.as_deref())
            .collect();
        assert_eq!(flagged, vec![Some("m"), Some("t")]);
    }

    #[test]
    fn test_flatten_keeps_focal_flag() {
        let item = table("fct").focal();
        let (nodes, _) = flatten(&[depth(0, vec![platform("P", vec![item, table("dim")])])]);
        let catalog = NodeCatalog::build_index(nodes).unwrap();

        let focal: Vec<_> = catalog.focal_nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(focal, vec!["fct"]);
    }

    #[test]
    fn test_flatten_reports_duplicate_column_once() {
        let item = SourceItem::new("t", "T", ObjType::Table).with_columns(vec![
            Column::new("ID", "INT"),
            Column::new("ID", "INT"),
            Column::new("ID", "VARCHAR"),
        ]);

        let (_, issues) = flatten(&[depth(0, vec![platform("P", vec![item])])]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, issue_codes::DUPLICATE_COLUMN);
        assert_eq!(issues[0].column.as_deref(), Some("ID"));
    }

    #[test]
    fn test_flatten_collects_alerts_from_flags() {
        let mut item = table("orders");
        item.has_error = true;
        item.error_message = Some("sync failed".to_string());
        item.warning_message = Some("ignored without the flag".to_string());
        item.has_upstream_issues = true;

        let (nodes, _) = flatten(&[depth(0, vec![platform("P", vec![item])])]);
        let alerts = &nodes[0].alerts;
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, AlertKind::Error);
        assert_eq!(alerts[0].message.as_deref(), Some("sync failed"));
        assert_eq!(alerts[1].kind, AlertKind::UpstreamIssue);
        assert!(alerts[1].message.is_none());
        assert!(!nodes[0].has_alert(AlertKind::Warning));
    }

    #[test]
    fn test_build_index_rejects_duplicate_ids() {
        let (nodes, _) = flatten(&[
            depth(-1, vec![platform("P", vec![table("a"), table("b")])]),
            depth(1, vec![platform("Q", vec![table("a")])]),
        ]);

        let err = NodeCatalog::build_index(nodes).unwrap_err();
        let defects: Vec<_> = err.defects().collect();
        assert_eq!(defects.len(), 1);
        assert_eq!(defects[0].code, issue_codes::DUPLICATE_NODE_ID);
        assert_eq!(defects[0].node_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_index_neighbors() {
        let (nodes, _) = flatten(&[
            depth(-1, vec![platform("P", vec![table("a").with_downstream(&["c", "missing"])])]),
            depth(-1, vec![platform("P", vec![table("b").with_downstream(&["c"])])]),
            depth(0, vec![platform("P", vec![table("c")])]),
        ]);
        let catalog = NodeCatalog::build_index(nodes).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get_by_id("c").unwrap().name, "C");
        assert!(catalog.get_by_id("").is_none());

        let downstream: Vec<_> = catalog.downstream_of("a").into_iter().map(|n| n.id.as_str()).collect();
        assert_eq!(downstream, vec!["c"]);

        let upstream: Vec<_> = catalog.upstream_of("c").into_iter().map(|n| n.id.as_str()).collect();
        assert_eq!(upstream, vec!["a", "b"]);

        assert_eq!(catalog.depth_range(), Some((-1, 0)));
        assert_eq!(catalog.depth_count(), 2);
        assert_eq!(catalog.at_depth(-1).count(), 2);
    }
}
