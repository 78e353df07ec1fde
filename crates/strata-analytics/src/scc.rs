//! Strongly connected component decomposition with a work budget.
//!
//! # Algorithm
//!
//! Tarjan's algorithm, run iteratively with an explicit frame stack so deep
//! dependency chains cannot overflow the call stack. Roots are tried in node
//! order and edges are followed in input order.
//!
//! # Budget
//!
//! Every node visit and every edge traversal costs one work unit. When an
//! [`SccBudget`] bound is exceeded the decomposition stops with
//! [`Error::ResourceExhaustion`]. Retrying with the same input cannot help.
//!
//! # Output order
//!
//! Members of each [`Scc`] are sorted by node id (first-encounter order of
//! the input) and the list of SCCs is sorted by its smallest member, so the
//! result does not depend on traversal details.

#![allow(clippy::module_name_repetitions)]

use strata_core::{Error, Graph, NodeId, Result, SccBudget};
use tracing::{debug, instrument};

const UNVISITED: usize = usize::MAX;

/// One strongly connected component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scc {
    members: Vec<NodeId>,
    cyclic: bool,
}

impl Scc {
    /// Member ids, ascending.
    #[must_use]
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// `true` if the component contains at least one cycle: more than one
    /// member, or a single member with a self-loop.
    #[must_use]
    pub const fn is_cyclic(&self) -> bool {
        self.cyclic
    }
}

struct WorkMeter {
    spent: u64,
    limit: Option<u64>,
}

impl WorkMeter {
    fn tick(&mut self) -> Result<()> {
        self.spent += 1;
        match self.limit {
            Some(budget) if self.spent > budget => Err(Error::ResourceExhaustion { budget }),
            _ => Ok(()),
        }
    }
}

/// Decompose `graph` into strongly connected components.
///
/// Every node appears in exactly one [`Scc`], including nodes without any
/// edges.
///
/// # Errors
///
/// Returns [`Error::ResourceExhaustion`] if the decomposition needs more
/// work units than `budget` allows.
#[instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn strongly_connected_components<N, E>(
    graph: &Graph<N, E>,
    budget: &SccBudget,
) -> Result<Vec<Scc>> {
    let n = graph.node_count();
    let targets: Vec<Vec<usize>> = (0..n)
        .map(|v| {
            graph
                .outgoing(NodeId::from_index(v))
                .map(|(_, edge)| edge.target.index())
                .collect()
        })
        .collect();

    let mut meter = WorkMeter {
        spent: 0,
        limit: budget.max_work(),
    };
    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0_usize; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut next_index = 0_usize;
    let mut components: Vec<Vec<usize>> = Vec::new();

    // Each frame: (node, position of the next outgoing edge to follow).
    let mut frames: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if index[root] != UNVISITED {
            continue;
        }

        meter.tick()?;
        index[root] = next_index;
        lowlink[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;
        frames.push((root, 0));

        while let Some(frame) = frames.last_mut() {
            let (v, position) = *frame;

            if position < targets[v].len() {
                frame.1 += 1;
                let w = targets[v][position];
                meter.tick()?;

                if index[w] == UNVISITED {
                    meter.tick()?;
                    index[w] = next_index;
                    lowlink[w] = next_index;
                    next_index += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    frames.push((w, 0));
                } else if on_stack[w] {
                    lowlink[v] = lowlink[v].min(index[w]);
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                lowlink[parent] = lowlink[parent].min(lowlink[v]);
            }

            if lowlink[v] == index[v] {
                let mut component = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                components.push(component);
            }
        }
    }

    let mut sccs: Vec<Scc> = components
        .into_iter()
        .map(|mut members| {
            members.sort_unstable();
            let cyclic = members.len() > 1
                || graph.has_self_loop(NodeId::from_index(members[0]));
            Scc {
                members: members.into_iter().map(NodeId::from_index).collect(),
                cyclic,
            }
        })
        .collect();
    sccs.sort_unstable_by_key(|scc| scc.members[0]);

    debug!(
        sccs = sccs.len(),
        cyclic = sccs.iter().filter(|scc| scc.cyclic).count(),
        work = meter.spent,
        "scc decomposition complete"
    );

    Ok(sccs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::ErrorCode;

    fn graph(nodes: &[&'static str], edges: &[(&'static str, &'static str)]) -> Graph<&'static str, ()> {
        Graph::new(nodes.iter().copied(), edges.iter().map(|&(a, b)| (a, b, ())))
            .expect("valid graph")
    }

    fn labels(g: &Graph<&'static str, ()>, sccs: &[Scc]) -> Vec<Vec<&'static str>> {
        sccs.iter()
            .map(|scc| scc.members().iter().map(|&id| *g.node(id)).collect())
            .collect()
    }

    #[test]
    fn every_node_lands_in_exactly_one_component() {
        let g = graph(
            &["A", "B", "C", "D", "E", "F", "G"],
            &[("A", "B"), ("B", "A"), ("C", "D"), ("D", "E"), ("E", "C"), ("F", "F")],
        );
        let sccs = strongly_connected_components(&g, &SccBudget::unbounded()).expect("no budget");

        assert_eq!(
            labels(&g, &sccs),
            vec![vec!["A", "B"], vec!["C", "D", "E"], vec!["F"], vec!["G"]]
        );
        let cyclic: Vec<bool> = sccs.iter().map(Scc::is_cyclic).collect();
        assert_eq!(cyclic, vec![true, true, true, false]);
    }

    #[test]
    fn acyclic_chain_has_only_trivial_components() {
        let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let sccs = strongly_connected_components(&g, &SccBudget::unbounded()).expect("no budget");
        assert_eq!(sccs.len(), 3);
        assert!(sccs.iter().all(|scc| !scc.is_cyclic()));
    }

    #[test]
    fn deep_chain_does_not_overflow_the_stack() {
        let n = 200_000_u32;
        let g = Graph::new(0..n, (1..n).map(|i| (i - 1, i, ())).chain([(n - 1, 0, ())]))
            .expect("valid chain");
        let sccs = strongly_connected_components(&g, &SccBudget::unbounded()).expect("no budget");
        assert_eq!(sccs.len(), 1);
        assert_eq!(sccs[0].len(), n as usize);
    }

    #[test]
    fn exhausted_budget_is_reported() {
        let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);
        let budget = SccBudget::bounded(3).expect("positive budget");
        let err = strongly_connected_components(&g, &budget).expect_err("budget too small");
        assert_eq!(err.code(), ErrorCode::ResourceExhaustion);
        assert_eq!(err, Error::ResourceExhaustion { budget: 3 });
    }

    #[test]
    fn sufficient_budget_completes() {
        let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);
        // 3 node visits + 3 edge traversals.
        let budget = SccBudget::bounded(6).expect("positive budget");
        assert!(strongly_connected_components(&g, &budget).is_ok());
    }
}
