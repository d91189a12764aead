//! Helpers shared by the integration tests.

#![allow(dead_code)]

use graph_archive::prelude::*;
use half::f16;
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber once per test binary. `RUST_LOG=graph_archive=trace`
/// shows archive and codec events.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// 5 nodes, 7 edges, no optional fields.
pub fn five_node_graph() -> SamplingGraph {
    SamplingGraph::from_edges(5, &[(0, 1), (0, 2), (1, 2), (2, 3), (3, 4), (4, 0), (4, 1)])
        .expect("valid edges")
}

/// The five node graph with every optional field set.
///
/// Nodes 0..3 are papers and 3..5 authors; edge types alternate between
/// `cites` and `writes`.
pub fn heterogeneous_graph() -> SamplingGraph {
    let node_types: TypeIdMap = [("paper".to_string(), 0), ("author".to_string(), 1)]
        .into_iter()
        .collect();
    let edge_types: TypeIdMap = [("cites".to_string(), 0), ("writes".to_string(), 1)]
        .into_iter()
        .collect();

    let feat: Vec<f32> = (0..10).map(|i| i as f32 * 0.5).collect();
    let node_attributes = AttributeTable::new()
        .with("feat", NumericArray::from_slice_with_shape(&feat, (5, 2)).expect("5x2"))
        .expect("new column")
        .with("label", NumericArray::from_slice(&[3i64, 1, 4, 1, 5]))
        .expect("new column");

    let weight: Vec<f16> = (0..7).map(|i| f16::from_f32(i as f32 / 8.0)).collect();
    let stamps = [0.0f64, -0.0, f64::NAN, 1.5e300, f64::MIN_POSITIVE, -1.0, 7.25];
    let mask: Vec<Bool> = (0..7).map(|i| Bool::new(i % 3 != 1)).collect();
    let edge_attributes = AttributeTable::new()
        .with("weight", NumericArray::from_slice(&weight))
        .expect("new column")
        .with("timestamp", NumericArray::from_slice(&stamps))
        .expect("new column")
        .with("mask", NumericArray::from_slice(&mask))
        .expect("new column");

    five_node_graph()
        .with_node_type_to_id(node_types)
        .and_then(|g| g.with_node_type_offset(vec![0, 3, 5]))
        .and_then(|g| g.with_edge_type_to_id(edge_types))
        .and_then(|g| g.with_type_per_edge(vec![0, 1, 0, 1, 0, 1, 0]))
        .and_then(|g| g.with_node_attributes(node_attributes))
        .and_then(|g| g.with_edge_attributes(edge_attributes))
        .expect("consistent heterogeneous graph")
}
