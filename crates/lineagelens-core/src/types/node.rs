//! Flattened lineage nodes and their column descriptors.

use chrono::NaiveDate;
use indexmap::IndexSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Object type discriminator as it appears in lineage sources (`objType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjType {
    Table,
    View,
    Dataset,
    Model,
    Dashboard,
    Api,
    Stage,
    External,
}

impl ObjType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::View => "VIEW",
            Self::Dataset => "DATASET",
            Self::Model => "MODEL",
            Self::Dashboard => "DASHBOARD",
            Self::Api => "API",
            Self::Stage => "STAGE",
            Self::External => "EXTERNAL",
        }
    }
}

impl std::fmt::Display for ObjType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported data quality of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DataQuality {
    High,
    Medium,
    Low,
}

/// Semantic kind of a column, derived from its raw type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    String,
    Number,
    Boolean,
    Date,
    Timestamp,
    Json,
    Array,
    Variant,
}

impl ColumnKind {
    /// Maps a warehouse type tag to its semantic kind.
    ///
    /// Tags outside the fixed table (BI field roles such as `MEASURE`, model
    /// feature types such as `NUMERIC`) have no semantic kind.
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        let kind = match type_name.trim().to_ascii_uppercase().as_str() {
            "VARCHAR" | "TEXT" | "STRING" => Self::String,
            "INTEGER" | "INT" | "BIGINT" | "NUMBER" | "DECIMAL" | "FLOAT" | "DOUBLE" => {
                Self::Number
            }
            "BOOLEAN" | "BOOL" => Self::Boolean,
            "DATE" => Self::Date,
            "TIMESTAMP" | "DATETIME" => Self::Timestamp,
            "JSON" | "OBJECT" => Self::Json,
            "ARRAY" => Self::Array,
            "VARIANT" => Self::Variant,
            _ => return None,
        };
        Some(kind)
    }
}

/// The role a descriptor plays on its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    #[default]
    Column,
    Feature,
    Output,
}

/// A column (or model feature/output) descriptor owned by exactly one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column name, unique within the owning node
    pub name: String,

    /// Raw type tag (e.g. `VARCHAR`, `MEASURE`, `NUMERIC`)
    #[serde(rename = "type")]
    pub data_type: String,

    /// Role tag assigned while flattening
    #[serde(default)]
    pub role: ColumnRole,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_primary_key: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_foreign_key: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Feature importance reported by a model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            role: ColumnRole::Column,
            is_primary_key: false,
            is_foreign_key: false,
            description: None,
            importance: None,
        }
    }

    pub fn with_role(mut self, role: ColumnRole) -> Self {
        self.role = role;
        self
    }

    pub fn kind(&self) -> Option<ColumnKind> {
        ColumnKind::from_type_name(&self.data_type)
    }
}

/// Where a node lives, attached from the group it was declared in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum NodeLocation {
    /// Item of a database-style group, nested in a schema.
    Database { database: String, schema: String },
    /// Item of a platform-style group (BI tool, API family, export target).
    Platform { platform: String },
}

impl NodeLocation {
    /// `DATABASE.SCHEMA` or the platform name.
    pub fn display_name(&self) -> String {
        match self {
            Self::Database { database, schema } => format!("{database}.{schema}"),
            Self::Platform { platform } => platform.clone(),
        }
    }
}

/// Kind-specific payload of a node, discriminated by `objType`.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(tag = "objType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Table { columns: Vec<Column> },
    View { columns: Vec<Column> },
    Dataset { columns: Vec<Column> },
    Api { columns: Vec<Column> },
    Stage { columns: Vec<Column> },
    Dashboard { columns: Vec<Column> },
    External { columns: Vec<Column> },
    Model {
        features: Vec<Column>,
        outputs: Vec<Column>,
    },
}

impl NodeKind {
    /// Builds the payload for a non-model object type.
    ///
    /// Returns `None` for [`ObjType::Model`], which carries features and
    /// outputs instead of columns.
    pub fn with_columns(obj_type: ObjType, columns: Vec<Column>) -> Option<Self> {
        let kind = match obj_type {
            ObjType::Table => Self::Table { columns },
            ObjType::View => Self::View { columns },
            ObjType::Dataset => Self::Dataset { columns },
            ObjType::Api => Self::Api { columns },
            ObjType::Stage => Self::Stage { columns },
            ObjType::Dashboard => Self::Dashboard { columns },
            ObjType::External => Self::External { columns },
            ObjType::Model => return None,
        };
        Some(kind)
    }

    pub fn obj_type(&self) -> ObjType {
        match self {
            Self::Table { .. } => ObjType::Table,
            Self::View { .. } => ObjType::View,
            Self::Dataset { .. } => ObjType::Dataset,
            Self::Api { .. } => ObjType::Api,
            Self::Stage { .. } => ObjType::Stage,
            Self::Dashboard { .. } => ObjType::Dashboard,
            Self::External { .. } => ObjType::External,
            Self::Model { .. } => ObjType::Model,
        }
    }

    /// All descriptors in declaration order; features precede outputs.
    pub fn descriptors(&self) -> impl Iterator<Item = &Column> {
        let (first, second) = match self {
            Self::Table { columns }
            | Self::View { columns }
            | Self::Dataset { columns }
            | Self::Api { columns }
            | Self::Stage { columns }
            | Self::Dashboard { columns }
            | Self::External { columns } => (columns.as_slice(), &[] as &[Column]),
            Self::Model { features, outputs } => (features.as_slice(), outputs.as_slice()),
        };
        first.iter().chain(second.iter())
    }
}

/// Kind of alert raised on a node by its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum AlertKind {
    /// The node itself failed (e.g. a broken sync).
    Error,
    /// The node may be stale or degraded.
    Warning,
    /// Something upstream of the node is failing.
    UpstreamIssue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeAlert {
    pub kind: AlertKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One object in the lineage graph, flattened out of its depth/group tree.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique, stable identifier
    pub id: String,

    /// Display name
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Signed distance from the focal node (negative = upstream)
    pub depth_level: i32,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_focal: bool,

    /// Ids of the nodes this node feeds, in declaration order
    pub downstream: Vec<String>,

    #[serde(flatten)]
    pub location: NodeLocation,

    #[serde(flatten)]
    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub tags: IndexSet<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<DataQuality>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alerts: Vec<NodeAlert>,
}

impl Node {
    /// Create a node with required fields and no descriptors.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        depth_level: i32,
        location: NodeLocation,
        kind: NodeKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            depth_level,
            is_focal: false,
            downstream: Vec::new(),
            location,
            kind,
            owner: None,
            created_at: None,
            tags: IndexSet::new(),
            data_quality: None,
            row_count: None,
            icon: None,
            alerts: Vec::new(),
        }
    }

    pub fn obj_type(&self) -> ObjType {
        self.kind.obj_type()
    }

    /// Columns, or features followed by outputs for models.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.kind.descriptors()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns().find(|column| column.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn has_alert(&self, kind: AlertKind) -> bool {
        self.alerts.iter().any(|alert| alert.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform() -> NodeLocation {
        NodeLocation::Platform {
            platform: "ML Models".to_string(),
        }
    }

    #[test]
    fn test_column_kind_lookup() {
        assert_eq!(ColumnKind::from_type_name("VARCHAR"), Some(ColumnKind::String));
        assert_eq!(ColumnKind::from_type_name("bigint"), Some(ColumnKind::Number));
        assert_eq!(ColumnKind::from_type_name("DATETIME"), Some(ColumnKind::Timestamp));
        assert_eq!(ColumnKind::from_type_name("OBJECT"), Some(ColumnKind::Json));
        assert_eq!(ColumnKind::from_type_name("MEASURE"), None);
        assert_eq!(ColumnKind::from_type_name("NUMERIC"), None);
        assert_eq!(ColumnKind::from_type_name(" varchar "), Some(ColumnKind::String));

        let column = Column::new("SIGNUP_DATE", "date");
        assert_eq!(column.kind(), Some(ColumnKind::Date));
        assert_eq!(column.data_type, "date");
    }

    #[test]
    fn test_with_columns_rejects_model() {
        assert!(NodeKind::with_columns(ObjType::Model, Vec::new()).is_none());
        let kind = NodeKind::with_columns(ObjType::View, vec![Column::new("ID", "INT")]).unwrap();
        assert_eq!(kind.obj_type(), ObjType::View);
    }

    #[test]
    fn test_model_descriptors_chain_features_then_outputs() {
        let node = Node::new(
            "churn",
            "Churn",
            2,
            platform(),
            NodeKind::Model {
                features: vec![Column::new("total_orders", "NUMERIC").with_role(ColumnRole::Feature)],
                outputs: vec![Column::new("churn_probability", "NUMERIC").with_role(ColumnRole::Output)],
            },
        );

        let names: Vec<_> = node.columns().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["total_orders", "churn_probability"]);
        assert!(node.has_column("churn_probability"));
        assert!(!node.has_column("CHURN_PROBABILITY"));
    }

    #[test]
    fn test_node_serializes_flat_with_obj_type_tag() {
        let mut node = Node::new(
            "orders",
            "ORDERS",
            -2,
            NodeLocation::Database {
                database: "ACME_PROD".to_string(),
                schema: "RAW_ECOMMERCE".to_string(),
            },
            NodeKind::Table {
                columns: vec![Column::new("ORDER_ID", "VARCHAR")],
            },
        );
        node.alerts.push(NodeAlert {
            kind: AlertKind::Error,
            message: Some("sync failed".to_string()),
        });

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["objType"], "TABLE");
        assert_eq!(json["depthLevel"], -2);
        assert_eq!(json["database"], "ACME_PROD");
        assert_eq!(json["schema"], "RAW_ECOMMERCE");
        assert_eq!(json["columns"][0]["type"], "VARCHAR");
        assert_eq!(json["alerts"][0]["kind"], "error");
        assert!(json.get("isFocal").is_none());
        assert!(json.get("platform").is_none());
    }
}
