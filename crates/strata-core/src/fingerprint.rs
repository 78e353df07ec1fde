//! Content fingerprints for regression tracking.
//!
//! Callers diff cycle and metric results across runs. Comparing fingerprints
//! first tells them whether the graph structure changed at all. The digest
//! covers node labels, node order and edge endpoints in edge order. Edge
//! descriptors are not hashed, so two graphs with the same fingerprint yield
//! the same cycles and metrics but may describe their dependencies
//! differently.

use std::fmt::Display;

use crate::graph::Graph;

/// BLAKE3 digest of a graph's nodes and edge endpoints, prefixed `blake3:`.
///
/// Edge descriptors are not part of the digest.
#[must_use]
pub fn graph_fingerprint<N: Display, E>(graph: &Graph<N, E>) -> String {
    let mut hasher = blake3::Hasher::new();

    hasher.update(&(graph.node_count() as u64).to_le_bytes());
    for (_, node) in graph.nodes() {
        let label = node.to_string();
        hasher.update(&(label.len() as u64).to_le_bytes());
        hasher.update(label.as_bytes());
    }

    hasher.update(&(graph.edge_count() as u64).to_le_bytes());
    for (_, edge) in graph.edges() {
        hasher.update(&(edge.source.index() as u64).to_le_bytes());
        hasher.update(&(edge.target.index() as u64).to_le_bytes());
    }

    format!("blake3:{}", hasher.finalize().to_hex())
}
