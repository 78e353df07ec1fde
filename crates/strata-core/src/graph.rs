//! Generic directed multigraph with a precomputed adjacency index.
//!
//! # Overview
//!
//! Callers hand in their own node identities (`N`) and an edge descriptor
//! (`E`, typically the relation that produced the dependency). Nodes are
//! interned into dense [`NodeId`]s in first-encounter order so the
//! algorithms in `strata-analytics` can work over plain vectors and
//! translate back to caller identities only when building results.
//!
//! ## Multigraph semantics
//!
//! Parallel edges between the same pair of nodes are kept as independent
//! edges, each with its own descriptor. Self-loops are allowed.
//!
//! ## Ordering
//!
//! Everything this type hands out follows input order: node ids follow the
//! first occurrence of each node, outgoing edges follow the order edges were
//! supplied. Downstream determinism depends on this.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{GraphDefect, Result};

/// Dense index of a node inside one [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Rebuild an id from its dense index.
    ///
    /// Only meaningful for indices below the owning graph's `node_count()`.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Dense index of an edge inside one [`Graph`], equal to its input position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EdgeId(usize);

impl EdgeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A directed edge with its attached descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<E> {
    pub source: NodeId,
    pub target: NodeId,
    pub descriptor: E,
}

/// An immutable directed multigraph over caller-chosen node identities.
#[derive(Debug, Clone)]
pub struct Graph<N, E> {
    nodes: Vec<N>,
    lookup: HashMap<N, NodeId>,
    edges: Vec<Edge<E>>,
    /// Outgoing edge ids per node, in input order.
    outgoing: Vec<Vec<EdgeId>>,
}

impl<N, E> Graph<N, E>
where
    N: Eq + Hash + Clone + fmt::Debug,
{
    /// Build a graph from a node set and an edge set.
    ///
    /// Repeated nodes collapse onto their first occurrence. Every edge is
    /// given as `(source, target, descriptor)` and both endpoints must be
    /// members of `nodes`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGraph`](crate::Error::InvalidGraph) with
    /// [`GraphDefect::UnknownNode`] if an edge endpoint is not in `nodes`.
    #[instrument(skip_all)]
    pub fn new<I, J>(nodes: I, edges: J) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        J: IntoIterator<Item = (N, N, E)>,
    {
        let mut interned: Vec<N> = Vec::new();
        let mut lookup: HashMap<N, NodeId> = HashMap::new();

        for node in nodes {
            if !lookup.contains_key(&node) {
                lookup.insert(node.clone(), NodeId(interned.len()));
                interned.push(node);
            }
        }

        let mut outgoing: Vec<Vec<EdgeId>> = vec![Vec::new(); interned.len()];
        let mut stored: Vec<Edge<E>> = Vec::new();

        for (position, (source, target, descriptor)) in edges.into_iter().enumerate() {
            let resolve = |node: &N| {
                lookup
                    .get(node)
                    .copied()
                    .ok_or_else(|| GraphDefect::UnknownNode {
                        edge: position,
                        node: format!("{node:?}"),
                    })
            };
            let source = resolve(&source)?;
            let target = resolve(&target)?;

            outgoing[source.0].push(EdgeId(stored.len()));
            stored.push(Edge {
                source,
                target,
                descriptor,
            });
        }

        debug!(nodes = interned.len(), edges = stored.len(), "graph built");

        Ok(Self {
            nodes: interned,
            lookup,
            edges: stored,
            outgoing,
        })
    }

    /// Look up the id of a caller node.
    #[must_use]
    pub fn node_id(&self, node: &N) -> Option<NodeId> {
        self.lookup.get(node).copied()
    }
}

impl<N, E> Graph<N, E> {
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Return the caller identity of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this graph.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &N {
        &self.nodes[id.0]
    }

    /// Iterate over all nodes in first-encounter order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = (NodeId, &N)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    #[must_use]
    pub fn edge(&self, id: EdgeId) -> &Edge<E> {
        &self.edges[id.0]
    }

    /// Iterate over all edges in input order.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = (EdgeId, &Edge<E>)> + '_ {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
    }

    /// Outgoing edges of `node` in input order.
    pub fn outgoing(&self, node: NodeId) -> impl ExactSizeIterator<Item = (EdgeId, &Edge<E>)> + '_ {
        self.outgoing[node.0].iter().map(|&id| (id, &self.edges[id.0]))
    }

    /// Distinct successors of `node`, ordered by their first outgoing edge.
    #[must_use]
    pub fn successors(&self, node: NodeId) -> Vec<NodeId> {
        let mut seen = HashSet::with_capacity(self.outgoing[node.0].len());
        self.outgoing(node)
            .map(|(_, edge)| edge.target)
            .filter(|target| seen.insert(*target))
            .collect()
    }

    /// All parallel edges `from -> to`, in input order.
    pub fn edges_between(&self, from: NodeId, to: NodeId) -> impl Iterator<Item = &Edge<E>> + '_ {
        self.outgoing(from)
            .map(|(_, edge)| edge)
            .filter(move |edge| edge.target == to)
    }

    #[must_use]
    pub fn has_self_loop(&self, node: NodeId) -> bool {
        self.edges_between(node, node).next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sample() -> Graph<&'static str, u32> {
        Graph::new(
            ["a", "b", "c", "a"],
            [("a", "b", 1), ("b", "c", 2), ("a", "b", 3), ("c", "c", 4)],
        )
        .unwrap_or_else(|e| panic!("valid graph rejected: {e}"))
    }

    #[test]
    fn duplicate_nodes_collapse_to_first_occurrence() {
        let g = sample();
        assert_eq!(g.node_count(), 3);
        let order: Vec<&str> = g.nodes().map(|(_, n)| *n).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn parallel_edges_are_kept_in_input_order() {
        let g = sample();
        let a = g.node_id(&"a").unwrap_or_else(|| panic!("a missing"));
        let b = g.node_id(&"b").unwrap_or_else(|| panic!("b missing"));

        let descriptors: Vec<u32> = g.edges_between(a, b).map(|e| e.descriptor).collect();
        assert_eq!(descriptors, vec![1, 3]);
        assert_eq!(g.successors(a), vec![b]);
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn successors_keep_first_edge_order_under_wide_fan_out() {
        // Targets repeat in descending order, interleaved with a self-loop.
        let width = 500_u32;
        let nodes: Vec<u32> = (0..=width).collect();
        let mut edges = Vec::new();
        for round in 0..3 {
            for target in (1..=width).rev() {
                edges.push((0, target, round));
                edges.push((0, 0, round));
            }
        }
        let g = Graph::new(nodes, edges).unwrap_or_else(|e| panic!("{e}"));
        let hub = g.node_id(&0).unwrap_or_else(|| panic!("hub missing"));

        let successors: Vec<u32> = g.successors(hub).into_iter().map(|id| *g.node(id)).collect();
        let mut expected: Vec<u32> = Vec::with_capacity(width as usize + 1);
        expected.push(width);
        expected.push(0);
        expected.extend((1..width).rev());
        assert_eq!(successors, expected);
        assert_eq!(g.outgoing(hub).len(), 6 * width as usize);
    }

    #[test]
    fn self_loops_are_allowed() {
        let g = sample();
        let c = g.node_id(&"c").unwrap_or_else(|| panic!("c missing"));
        assert!(g.has_self_loop(c));
        assert!(!g.has_self_loop(NodeId(0)));
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        let err = Graph::new(["a"], [("a", "ghost", ())]).expect_err("ghost endpoint accepted");
        assert_eq!(
            err,
            Error::InvalidGraph(GraphDefect::UnknownNode {
                edge: 0,
                node: "\"ghost\"".to_string(),
            })
        );
    }

    #[test]
    fn empty_graph_is_valid() {
        let g: Graph<u8, ()> = Graph::new([], []).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
    }
}
