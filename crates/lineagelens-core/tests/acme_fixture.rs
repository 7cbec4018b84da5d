mod common;

use common::{acme_graph, acme_source};
use lineagelens_core::{
    flatten, AlertKind, ColumnLink, ColumnRole, GraphOptions, LineageGraph, NodeCatalog,
    NodeLocation, ObjType, TransformType,
};
use rstest::rstest;

#[test]
fn fixture_builds_clean() {
    let graph = acme_graph();
    assert!(
        graph.issues().is_empty(),
        "unexpected issues: {:?}",
        graph.issues()
    );

    let strict = LineageGraph::build(acme_source(), &GraphOptions::strict());
    assert!(strict.is_ok(), "strict build failed: {:?}", strict.err());
}

#[test]
fn flattening_is_complete() {
    let source = acme_source();
    let (nodes, issues) = flatten(&source.depths);
    assert!(issues.is_empty());
    assert_eq!(nodes.len(), source.item_count());
    assert_eq!(nodes.len(), 31);

    let catalog = NodeCatalog::build_index(nodes).expect("fixture ids are unique");
    assert_eq!(catalog.len(), 31);
}

#[test]
fn summary_counts() {
    let summary = acme_graph().summary();
    assert_eq!(summary.node_count, 31);
    assert_eq!(summary.depth_count, 7);
    assert_eq!(summary.min_depth, Some(-3));
    assert_eq!(summary.max_depth, Some(3));
    assert_eq!(summary.object_edge_count, 32);
    assert_eq!(summary.column_edge_count, 115);
    assert_eq!(summary.focal_node.as_deref(), Some("fct_customer_orders"));
}

#[rstest]
#[case(-3, 6)]
#[case(-2, 7)]
#[case(-1, 6)]
#[case(0, 1)]
#[case(1, 4)]
#[case(2, 5)]
#[case(3, 2)]
#[case(4, 0)]
fn nodes_per_depth(#[case] level: i32, #[case] expected: usize) {
    let graph = acme_graph();
    let nodes = graph.nodes_at_depth(level);
    assert_eq!(nodes.len(), expected);
    assert!(nodes.iter().all(|n| n.depth_level == level));
}

#[test]
fn list_nodes_keeps_declaration_order() {
    let graph = acme_graph();
    let ids: Vec<_> = graph.list_nodes().iter().map(|n| n.id.as_str()).take(3).collect();
    assert_eq!(ids, vec!["shopify-api", "stripe-api", "salesforce-api"]);
    assert_eq!(graph.list_nodes().last().unwrap().id, "investor-data-room");
}

#[test]
fn stg_orders_amount_comes_from_orders_total() {
    let graph = acme_graph();
    assert_eq!(
        graph.get_upstream_columns("stg_orders", "ORDER_AMOUNT_USD"),
        vec![ColumnLink::new(
            "orders",
            "TOTAL_AMOUNT",
            TransformType::CurrencyConvert
        )]
    );
}

#[test]
fn focal_order_amount_feeds_revenue_rollups() {
    let graph = acme_graph();
    let downstream = graph.get_downstream_columns("fct_customer_orders", "ORDER_AMOUNT");

    assert!(downstream.contains(&ColumnLink::new(
        "dim_customers",
        "TOTAL_REVENUE",
        TransformType::Sum
    )));
    assert!(downstream.contains(&ColumnLink::new(
        "fct_daily_revenue",
        "TOTAL_REVENUE",
        TransformType::Sum
    )));
    assert_eq!(downstream.len(), 5);
}

#[test]
fn related_columns_for_focal_order_amount() {
    let graph = acme_graph();
    let related = graph.get_related_columns("fct_customer_orders", "ORDER_AMOUNT");

    let nodes: Vec<_> = related.keys().map(String::as_str).collect();
    assert_eq!(
        nodes,
        vec!["stg_orders", "dim_customers", "fct_daily_revenue", "fct_attribution"]
    );

    let dim: Vec<_> = related["dim_customers"].iter().map(String::as_str).collect();
    assert_eq!(dim, vec!["TOTAL_REVENUE", "AVERAGE_ORDER_VALUE"]);

    // One hop only: the raw source behind stg_orders is not included.
    assert!(!related.contains_key("orders"));
}

#[rstest]
#[case("dim_customers", "finance-weekly-report")]
#[case("fct_customer_orders", "stg_orders")]
#[case("", "")]
fn absent_object_edges(#[case] source: &str, #[case] target: &str) {
    assert!(acme_graph().get_object_edge(source, target).is_none());
}

#[test]
fn object_edge_metadata() {
    let graph = acme_graph();
    let edge = graph
        .get_object_edge("stg_orders", "fct_customer_orders")
        .expect("edge exists");

    assert_eq!(edge.query_type.as_deref(), Some("CREATE TABLE"));
    assert_eq!(edge.external_tool.as_ref().map(|t| t.name.as_str()), Some("dbt"));
    assert_eq!(edge.row_count, Some(2_847_563));
    assert_eq!(edge.stored_procedures.len(), 2);
    assert!(!edge.tasks.is_empty());
}

#[test]
fn focal_node_neighbors() {
    let graph = acme_graph();
    let focal = graph.focal_node().expect("focal node");
    assert_eq!(focal.id, "fct_customer_orders");
    assert_eq!(focal.obj_type(), ObjType::Dataset);
    assert!(focal.has_alert(AlertKind::UpstreamIssue));

    let downstream: Vec<_> = graph
        .downstream_nodes(&focal.id)
        .into_iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(
        downstream,
        vec!["dim_customers", "fct_daily_revenue", "fct_attribution", "user_journey_agg"]
    );

    let upstream: Vec<_> = graph
        .upstream_nodes(&focal.id)
        .into_iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(
        upstream,
        vec![
            "stg_orders",
            "stg_payments",
            "stg_customers",
            "stg_sessions",
            "stg_web_events"
        ]
    );
}

#[test]
fn raw_orders_table_details() {
    let graph = acme_graph();
    let orders = graph.get_node("orders").expect("orders node");

    assert!(matches!(orders.location, NodeLocation::Database { .. }));
    assert!(orders.has_alert(AlertKind::Error));
    assert!(orders.tags.contains("fivetran"));
    assert!(orders.has_column("TOTAL_AMOUNT"));
    assert!(orders.columns().all(|c| c.role == ColumnRole::Column));
}

#[test]
fn model_descriptors_carry_roles() {
    let graph = acme_graph();
    let model = graph.get_node("churn_prediction_model").expect("model node");

    assert_eq!(model.obj_type(), ObjType::Model);
    assert!(matches!(model.location, NodeLocation::Platform { .. }));
    assert!(model.columns().any(|c| c.role == ColumnRole::Feature));
    assert!(model.columns().any(|c| c.role == ColumnRole::Output));
    assert!(model
        .columns()
        .all(|c| c.role != ColumnRole::Column));
}

#[test]
fn every_lineage_endpoint_resolves() {
    let graph = acme_graph();
    let source = acme_source();
    for edge in &source.column_lineage {
        let src = graph.get_node(&edge.source_table).expect("source node");
        let tgt = graph.get_node(&edge.target_table).expect("target node");
        assert!(src.has_column(&edge.source_column), "{edge:?}");
        assert!(tgt.has_column(&edge.target_column), "{edge:?}");
    }
}

#[test]
fn node_serializes_with_location_context() {
    let graph = acme_graph();
    let json = serde_json::to_value(graph.get_node("stg_orders").unwrap()).unwrap();
    assert_eq!(json["objType"], "VIEW");
    assert_eq!(json["depthLevel"], -1);
    assert!(json.get("database").is_some());
    assert!(json.get("schema").is_some());
}
