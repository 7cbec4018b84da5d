//! Types for the lineage graph API.
//!
//! This module defines the source format consumed at load time and the typed
//! nodes, edges, and query results exposed once the graph is built.

mod column;
mod common;
mod edge;
mod node;
mod options;
mod serde_utils;
mod source;

// Re-export all public types
pub use column::{ColumnLineageEdge, ColumnLink, RelatedColumns, TransformType};
pub use common::{issue_codes, Issue, IssueCount, Severity, Summary};
pub use edge::{ExternalTool, ObjectEdge, RunStatus, StoredProcedure, Task};
pub use node::{
    AlertKind, Column, ColumnKind, ColumnRole, DataQuality, Node, NodeAlert, NodeKind,
    NodeLocation, ObjType,
};
pub use options::{ColumnCheck, GraphOptions};
pub use serde_utils::RUN_TIMESTAMP_FORMAT;
pub use source::{
    DatabaseGroup, DepthDirection, DepthLevel, LineageSource, PlatformGroup, SourceGroup,
    SourceItem, SourceSchema,
};
