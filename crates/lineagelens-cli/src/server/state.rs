//! Shared application state for the server.
//!
//! The graph is built once before the server starts and never mutated, so
//! handlers share it through `Arc` without locking.

use lineagelens_core::LineageGraph;

/// Server configuration derived from CLI arguments.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Display name of the loaded lineage source (file path or `<stdin>`)
    pub source_name: String,
}

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    pub graph: LineageGraph,
}

impl AppState {
    pub fn new(config: ServerConfig, graph: LineageGraph) -> Self {
        Self { config, graph }
    }
}
