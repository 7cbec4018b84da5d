//! Unit tests for serve mode API handlers.
//!
//! These tests drive the router with `oneshot` against the fixture graph,
//! without starting a full HTTP server.

#![cfg(feature = "serve")]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use lineagelens_cli::server::{build_router, state::AppState, state::ServerConfig};
use lineagelens_core::{GraphOptions, LineageGraph};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../lineagelens-core/tests/fixtures/acme_lineage.json");
    let json = std::fs::read_to_string(&path).unwrap();
    let graph = LineageGraph::from_json(&json, &GraphOptions::default()).unwrap();

    let config = ServerConfig {
        port: 3000,
        source_name: "acme_lineage.json".to_string(),
    };
    build_router(Arc::new(AppState::new(config, graph)), 3000)
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let response = app()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&body).to_string())
    });
    (status, json)
}

// === Graph-level endpoints ===

#[tokio::test]
async fn health_returns_ok_status() {
    let (status, json) = get("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["source"], "acme_lineage.json");
}

#[tokio::test]
async fn summary_counts_fixture() {
    let (status, json) = get("/api/summary").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["nodeCount"], 31);
    assert_eq!(json["depthCount"], 7);
    assert_eq!(json["objectEdgeCount"], 32);
    assert_eq!(json["columnEdgeCount"], 115);
    assert_eq!(json["focalNode"], "fct_customer_orders");
}

#[tokio::test]
async fn issues_empty_for_clean_fixture() {
    let (status, json) = get("/api/issues").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([]));
}

// === Node endpoints ===

#[tokio::test]
async fn nodes_lists_all() {
    let (status, json) = get("/api/nodes").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 31);
}

#[tokio::test]
async fn nodes_filters_by_depth() {
    let (status, json) = get("/api/nodes?depth=3").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["finance-weekly-report", "investor-data-room"]);
}

#[tokio::test]
async fn node_by_id() {
    let (status, json) = get("/api/nodes/orders").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["objType"], "TABLE");
    assert_eq!(json["depthLevel"], -2);
    assert_eq!(json["downstream"], json!(["stg_orders"]));
}

#[tokio::test]
async fn unknown_node_returns_404() {
    let (status, json) = get("/api/nodes/does-not-exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, "Unknown node: does-not-exist");
}

// === Edge endpoints ===

#[tokio::test]
async fn edge_metadata() {
    let (status, json) = get("/api/edges/orders/stg_orders").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["queryType"], "CREATE VIEW");
    assert_eq!(json["externalTool"]["name"], "dbt");
}

#[tokio::test]
async fn reversed_edge_returns_404() {
    let (status, _) = get("/api/edges/stg_orders/orders").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// === Column endpoints ===

#[tokio::test]
async fn upstream_columns() {
    let (status, json) = get("/api/columns/stg_orders/ORDER_AMOUNT_USD/upstream").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!([{
            "itemId": "orders",
            "columnName": "TOTAL_AMOUNT",
            "transformType": "CURRENCY_CONVERT"
        }])
    );
}

#[tokio::test]
async fn downstream_columns() {
    let (status, json) = get("/api/columns/fct_customer_orders/ORDER_AMOUNT/downstream").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn related_columns() {
    let (status, json) = get("/api/columns/fct_customer_orders/ORDER_AMOUNT/related").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_object().unwrap().len(), 4);
    assert_eq!(json["stg_orders"], json!(["ORDER_AMOUNT_USD"]));
}

#[tokio::test]
async fn unknown_column_returns_empty_collection() {
    let (status, json) = get("/api/columns/nope/NOPE/upstream").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([]));

    let (status, json) = get("/api/columns/nope/NOPE/related").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({}));
}
