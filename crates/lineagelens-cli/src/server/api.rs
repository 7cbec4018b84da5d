//! REST API handlers for serve mode.
//!
//! Every endpoint is a read-only query against the shared [`LineageGraph`].
//! Unknown nodes and edges answer 404; column queries on unknown endpoints
//! answer 200 with an empty collection.
//!
//! [`LineageGraph`]: lineagelens_core::LineageGraph

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use lineagelens_core::Node;
use serde::{Deserialize, Serialize};

use super::AppState;

/// Build the API router with all endpoints.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/summary", get(summary))
        .route("/issues", get(issues))
        .route("/nodes", get(nodes))
        .route("/nodes/{id}", get(node))
        .route("/edges/{source}/{target}", get(edge))
        .route("/columns/{node}/{column}/upstream", get(upstream))
        .route("/columns/{node}/{column}/downstream", get(downstream))
        .route("/columns/{node}/{column}/related", get(related))
}

// === Request/Response types ===

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    source: String,
}

#[derive(Deserialize)]
struct NodesQuery {
    #[serde(default)]
    depth: Option<i32>,
}

#[derive(Deserialize)]
struct ColumnPath {
    node: String,
    column: String,
}

// === Handlers ===

/// GET /api/health - Health check with version and loaded source
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        source: state.config.source_name.clone(),
    })
}

/// GET /api/summary - Graph statistics
async fn summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.graph.summary())
}

/// GET /api/issues - Non-fatal issues recorded at build time
async fn issues(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.graph.issues().to_vec())
}

/// GET /api/nodes?depth=N - All nodes, or the nodes at one depth level
async fn nodes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NodesQuery>,
) -> impl IntoResponse {
    let nodes: Vec<Node> = match query.depth {
        Some(level) => state.graph.nodes_at_depth(level).into_iter().cloned().collect(),
        None => state.graph.list_nodes().to_vec(),
    };
    Json(nodes)
}

/// GET /api/nodes/{id} - One node
async fn node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .graph
        .get_node(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Unknown node: {id}")))
}

/// GET /api/edges/{source}/{target} - Execution metadata of one object edge
async fn edge(
    State(state): State<Arc<AppState>>,
    Path((source, target)): Path<(String, String)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .graph
        .get_object_edge(&source, &target)
        .cloned()
        .map(Json)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                format!("No object edge from {source} to {target}"),
            )
        })
}

/// GET /api/columns/{node}/{column}/upstream - Direct sources of a column
async fn upstream(
    State(state): State<Arc<AppState>>,
    Path(path): Path<ColumnPath>,
) -> impl IntoResponse {
    Json(state.graph.get_upstream_columns(&path.node, &path.column))
}

/// GET /api/columns/{node}/{column}/downstream - Direct targets of a column
async fn downstream(
    State(state): State<Arc<AppState>>,
    Path(path): Path<ColumnPath>,
) -> impl IntoResponse {
    Json(state.graph.get_downstream_columns(&path.node, &path.column))
}

/// GET /api/columns/{node}/{column}/related - Columns one hop away, grouped by node
async fn related(
    State(state): State<Arc<AppState>>,
    Path(path): Path<ColumnPath>,
) -> impl IntoResponse {
    Json(state.graph.get_related_columns(&path.node, &path.column))
}
