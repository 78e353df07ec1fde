//! Cumulative component dependency metrics (John Lakos).
//!
//! # Definitions
//!
//! - `DependsOn(c)`: number of components reachable from `c`, counting `c`
//!   itself. Members of one dependency cycle reach each other, so they all
//!   get the same value. This is how cycles inflate the metrics.
//! - `CCD = Σ DependsOn(c)`
//! - `ACD = CCD / n`
//! - `RACD = ACD / n`
//! - `NCCD = CCD / CCD(balanced binary tree with n components)`
//!
//! # Algorithm
//!
//! SCCs of the component graph come out of `petgraph::algo::tarjan_scc` in
//! reverse topological order, so each SCC's reachable set is its own
//! members plus the already-computed sets of the SCCs it points to. Sets are
//! [`FixedBitSet`]s; counting bits gives `DependsOn` exactly.

use fixedbitset::FixedBitSet;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use strata_core::ComponentGraph;
use tracing::{debug, instrument};

/// `DependsOn` of one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentDependsOn {
    pub component: String,
    pub depends_on: u64,
}

/// Cumulative dependency metrics of a component set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LakosMetrics {
    /// CCD: sum of `DependsOn` over all components.
    pub cumulative_component_dependency: u64,
    /// ACD: CCD divided by the number of components.
    pub average_component_dependency: f64,
    /// RACD: ACD divided by the number of components.
    pub relative_average_component_dependency: f64,
    /// NCCD: CCD divided by the CCD of a balanced binary tree of equal size.
    pub normalized_cumulative_component_dependency: f64,
    /// `DependsOn` per component, in component order.
    pub per_component: Vec<ComponentDependsOn>,
}

impl LakosMetrics {
    #[must_use]
    pub fn depends_on(&self, component: &str) -> Option<u64> {
        self.per_component
            .iter()
            .find(|c| c.component == component)
            .map(|c| c.depends_on)
    }
}

/// Compute Lakos metrics for `graph`.
///
/// An empty component set yields zero for every aggregate.
#[must_use]
#[instrument(skip_all, fields(components = graph.len()))]
#[allow(clippy::cast_precision_loss)]
pub fn lakos_metrics<E>(graph: &ComponentGraph<'_, E>) -> LakosMetrics {
    let n = graph.len();
    let depends_on = reachable_counts(graph);

    let ccd: u64 = depends_on.iter().sum();
    let (acd, racd, nccd) = if n == 0 {
        (0.0, 0.0, 0.0)
    } else {
        let acd = ccd as f64 / n as f64;
        let nccd = ccd as f64 / balanced_binary_tree_ccd(n) as f64;
        (acd, acd / n as f64, nccd)
    };

    let per_component = depends_on
        .into_iter()
        .enumerate()
        .map(|(position, depends_on)| ComponentDependsOn {
            component: graph.identifier(position).to_string(),
            depends_on,
        })
        .collect();

    debug!(ccd, acd, racd, nccd, "lakos metrics computed");

    LakosMetrics {
        cumulative_component_dependency: ccd,
        average_component_dependency: acd,
        relative_average_component_dependency: racd,
        normalized_cumulative_component_dependency: nccd,
        per_component,
    }
}

/// CCD of a balanced binary tree with `n` components.
///
/// Laying the tree out level by level, the component at level `d` (root at
/// 0) is reachable from itself and its `d` ancestors, so it contributes
/// `d + 1`. The component numbered `i` (1-based, breadth-first) sits at level
/// `floor(log2 i)`.
#[must_use]
pub fn balanced_binary_tree_ccd(n: usize) -> u64 {
    (1..=n).map(|i| u64::from(i.ilog2()) + 1).sum()
}

fn reachable_counts<E>(graph: &ComponentGraph<'_, E>) -> Vec<u64> {
    let n = graph.len();
    let mut dag: DiGraph<(), ()> = DiGraph::with_capacity(n, graph.edge_count());
    let nodes: Vec<NodeIndex> = (0..n).map(|_| dag.add_node(())).collect();
    for from in 0..n {
        for &to in graph.successors(from) {
            dag.add_edge(nodes[from], nodes[to], ());
        }
    }

    // Reverse topological order: every SCC appears after the SCCs it reaches.
    let sccs = tarjan_scc(&dag);
    let mut scc_of = vec![0_usize; n];
    for (i, scc) in sccs.iter().enumerate() {
        for node in scc {
            scc_of[node.index()] = i;
        }
    }

    let mut reach: Vec<FixedBitSet> = Vec::with_capacity(sccs.len());
    for (i, scc) in sccs.iter().enumerate() {
        let mut set = FixedBitSet::with_capacity(n);
        for node in scc {
            set.insert(node.index());
            for &succ in graph.successors(node.index()) {
                let target = scc_of[succ];
                if target != i {
                    set.union_with(&reach[target]);
                }
            }
        }
        reach.push(set);
    }

    (0..n)
        .map(|c| reach[scc_of[c]].count_ones(..) as u64)
        .collect()
}
