//! The lineage source format: a depth-organized node tree plus edge lists.
//!
//! This is the loading boundary. A source can come from a hand-written
//! fixture, a metadata export, or anything else that produces this JSON shape.

use chrono::NaiveDate;
use indexmap::IndexSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::column::ColumnLineageEdge;
use super::edge::ObjectEdge;
use super::node::{Column, DataQuality, ObjType};

/// A complete lineage source document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineageSource {
    /// Depth levels ordered from most upstream to most downstream
    pub depths: Vec<DepthLevel>,

    /// Object-level edges with execution metadata
    #[serde(default)]
    pub object_edges: Vec<ObjectEdge>,

    /// Column-level lineage edges
    #[serde(default)]
    pub column_lineage: Vec<ColumnLineageEdge>,
}

/// Which side of the focal node a depth level sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DepthDirection {
    Upstream,
    Focal,
    Downstream,
}

/// One depth level relative to the focal node.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepthLevel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Signed distance from the focal node
    pub level: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<DepthDirection>,

    #[serde(default)]
    pub groups: Vec<SourceGroup>,
}

/// A group of items at one depth level.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceGroup {
    /// Warehouse database whose items are nested in schemas.
    Database(DatabaseGroup),
    /// Flat list of items hosted on one platform.
    Platform(PlatformGroup),
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub database: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub schemas: Vec<SourceSchema>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub items: Vec<SourceItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub items: Vec<SourceItem>,
}

/// A node as declared in the source, before flattening.
///
/// Fields are loose on purpose: flattening checks that descriptor lists match
/// the declared `objType` and reports mismatches as issues.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceItem {
    pub id: String,
    pub name: String,
    pub obj_type: ObjType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default)]
    pub downstream: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<DataQuality>,

    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub tags: IndexSet<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_focal: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<Column>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<Column>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<Column>>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_error: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_warning: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_message: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_upstream_issues: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_issue_message: Option<String>,
}

impl SourceItem {
    /// Create an item with required fields and nothing else.
    pub fn new(id: impl Into<String>, name: impl Into<String>, obj_type: ObjType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            obj_type,
            icon: None,
            downstream: Vec::new(),
            description: None,
            owner: None,
            created_at: None,
            data_quality: None,
            tags: IndexSet::new(),
            row_count: None,
            is_focal: false,
            columns: None,
            features: None,
            outputs: None,
            has_error: false,
            error_message: None,
            has_warning: false,
            warning_message: None,
            has_upstream_issues: false,
            upstream_issue_message: None,
        }
    }

    /// Set the columns.
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Set the downstream node ids.
    pub fn with_downstream(mut self, downstream: &[&str]) -> Self {
        self.downstream = downstream.iter().map(|id| id.to_string()).collect();
        self
    }

    /// Mark the item as the focal node.
    pub fn focal(mut self) -> Self {
        self.is_focal = true;
        self
    }
}

impl LineageSource {
    /// Parse a source document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Total number of items declared across all depth levels.
    pub fn item_count(&self) -> usize {
        self.depths
            .iter()
            .flat_map(|depth| &depth.groups)
            .map(|group| match group {
                SourceGroup::Database(db) => db.schemas.iter().map(|s| s.items.len()).sum(),
                SourceGroup::Platform(platform) => platform.items.len(),
            })
            .sum()
    }
}
