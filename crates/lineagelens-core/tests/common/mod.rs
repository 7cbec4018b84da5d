use std::path::PathBuf;

use lineagelens_core::{GraphOptions, LineageGraph, LineageSource};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Loads the ACME e-commerce lineage source shared by the integration tests.
pub fn acme_source() -> LineageSource {
    let path = fixture_path("acme_lineage.json");
    let json = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    LineageSource::from_json(&json).expect("fixture should parse")
}

pub fn acme_graph() -> LineageGraph {
    LineageGraph::build(acme_source(), &GraphOptions::default()).expect("fixture should build")
}
