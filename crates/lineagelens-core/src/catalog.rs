//! In-memory catalogs backing a built lineage graph.
//!
//! Each catalog owns one slice of the source: flattened nodes, object edges,
//! or column-lineage edges. Catalogs are built once and never mutated.

mod columns;
mod edges;
mod nodes;

pub use columns::ColumnLineageIndex;
pub use edges::EdgeCatalog;
pub use nodes::{flatten, NodeCatalog};
