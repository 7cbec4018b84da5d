//! Column-level lineage catalog and query engine.
//!
//! A [`LineageSource`] describes nodes organized by depth around one focal node,
//! object-level edges with execution metadata, and column-level lineage edges.
//! [`LineageGraph::build`] flattens and validates it once; afterwards the graph
//! answers node, edge, and column-neighborhood queries without mutation.
//!
//! ```
//! use lineagelens_core::{GraphOptions, LineageGraph};
//!
//! let json = r#"{ "depths": [ { "level": 0, "groups": [
//!     { "type": "platform", "name": "Warehouse", "items": [
//!         { "id": "orders", "name": "ORDERS", "objType": "TABLE", "isFocal": true }
//!     ] } ] } ] }"#;
//!
//! let graph = LineageGraph::from_json(json, &GraphOptions::default())?;
//! assert_eq!(graph.focal_node().map(|n| n.id.as_str()), Some("orders"));
//! # Ok::<(), lineagelens_core::CatalogError>(())
//! ```

pub mod catalog;
pub mod error;
pub mod graph;
pub mod types;
mod validation;

pub use catalog::{flatten, ColumnLineageIndex, EdgeCatalog, NodeCatalog};
pub use error::CatalogError;
pub use graph::LineageGraph;

// Re-export types explicitly
pub use types::{
    issue_codes,
    AlertKind,
    Column,
    ColumnCheck,
    ColumnKind,
    ColumnLineageEdge,
    ColumnLink,
    ColumnRole,
    DataQuality,
    DatabaseGroup,
    DepthDirection,
    DepthLevel,
    ExternalTool,
    GraphOptions,
    Issue,
    IssueCount,
    LineageSource,
    Node,
    NodeAlert,
    NodeKind,
    NodeLocation,
    ObjType,
    ObjectEdge,
    PlatformGroup,
    RelatedColumns,
    RunStatus,
    Severity,
    SourceGroup,
    SourceItem,
    SourceSchema,
    StoredProcedure,
    Summary,
    Task,
    TransformType,
};
