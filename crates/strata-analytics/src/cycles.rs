//! Bounded enumeration of elementary cycles.
//!
//! # Overview
//!
//! 1. The whole graph is decomposed into strongly connected components
//!    ([`strongly_connected_components`]). Components without a cycle are
//!    discarded. This step always runs to completion before anything is
//!    capped, so the caps never hide whether a cycle exists.
//! 2. Inside each cyclic component, elementary cycles are enumerated with
//!    Johnson's algorithm. Nodes on the current path are blocked and only
//!    unblocked once a cycle through them has been found, which keeps dense
//!    components tractable.
//! 3. Enumeration stops once [`CycleLimits::max_cycles`] cycles have been
//!    emitted and one more is found; [`Cycles::truncated`] reports that.
//! 4. Each step of a reported cycle lists the parallel edges between its two
//!    nodes in input order, capped at [`CycleLimits::max_edges_per_step`],
//!    together with the true edge count.
//!
//! # Order
//!
//! Output order is a pure function of the input order:
//!
//! - cyclic SCCs by their smallest node id (first-encounter order),
//! - within an SCC, start nodes by ascending id; a start node only closes
//!   cycles whose other nodes have larger ids,
//! - successors by the position of their first edge in the input.
//!
//! When the cap is reached the first `max_cycles` cycles in this order are
//! the ones kept.

#![allow(clippy::module_name_repetitions)]

use std::fmt;

use serde::Serialize;
use strata_core::{CycleLimits, Graph, NodeId, Result, SccBudget};
use tracing::{debug, instrument, warn};

use crate::scc::{Scc, strongly_connected_components};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One step `from -> to` of a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleStep<N, E> {
    pub from: N,
    pub to: N,
    /// Descriptors of the parallel edges `from -> to`, in input order,
    /// capped at the configured per-step maximum.
    pub edges: Vec<E>,
    /// Number of parallel edges `from -> to` in the graph, never capped.
    pub total_edges: usize,
}

impl<N, E> CycleStep<N, E> {
    /// Edges that exist but were left out of [`CycleStep::edges`].
    #[must_use]
    pub fn suppressed_edges(&self) -> usize {
        self.total_edges - self.edges.len()
    }
}

/// An elementary cycle, as the ordered list of its steps.
///
/// The last step leads back to the `from` node of the first step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle<N, E> {
    steps: Vec<CycleStep<N, E>>,
}

impl<N, E> Cycle<N, E> {
    #[must_use]
    pub fn steps(&self) -> &[CycleStep<N, E>] {
        &self.steps
    }

    /// Nodes of the cycle in traversal order, without repeating the start.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &N> + '_ {
        self.steps.iter().map(|step| &step.from)
    }

    /// Number of distinct nodes (equal to the number of steps).
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.steps.len() == 1
    }
}

impl<N: fmt::Display, E> fmt::Display for Cycle<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "{} -> ", step.from)?;
        }
        match self.steps.first() {
            Some(first) => write!(f, "{}", first.from),
            None => Ok(()),
        }
    }
}

/// Cycles found in a graph, capped at the configured maximum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycles<N, E> {
    cycles: Vec<Cycle<N, E>>,
    truncated: bool,
}

impl<N, E> Cycles<N, E> {
    /// `true` if more cycles exist than were reported.
    #[must_use]
    pub const fn truncated(&self) -> bool {
        self.truncated
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cycle<N, E>> {
        self.cycles.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Cycle<N, E>> {
        self.cycles
    }
}

impl<'a, N, E> IntoIterator for &'a Cycles<N, E> {
    type Item = &'a Cycle<N, E>;
    type IntoIter = std::slice::Iter<'a, Cycle<N, E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cycles.iter()
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Detect cycles in `graph` with an unbounded SCC budget.
///
/// # Errors
///
/// Never fails with an unbounded budget; the signature matches
/// [`detect_cycles_with_budget`].
pub fn detect_cycles<N, E>(graph: &Graph<N, E>, limits: &CycleLimits) -> Result<Cycles<N, E>>
where
    N: Clone,
    E: Clone,
{
    detect_cycles_with_budget(graph, limits, &SccBudget::unbounded())
}

/// Detect cycles in `graph`.
///
/// Reaching [`CycleLimits::max_cycles`] is not an error: the result is
/// returned with [`Cycles::truncated`] set.
///
/// # Errors
///
/// Returns [`Error::ResourceExhaustion`](strata_core::Error::ResourceExhaustion)
/// if the SCC decomposition exceeds `budget`.
#[instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn detect_cycles_with_budget<N, E>(
    graph: &Graph<N, E>,
    limits: &CycleLimits,
    budget: &SccBudget,
) -> Result<Cycles<N, E>>
where
    N: Clone,
    E: Clone,
{
    let sccs = strongly_connected_components(graph, budget)?;
    let mut search = Johnson::new(graph, limits.max_cycles());

    for scc in sccs.iter().filter(|scc| scc.is_cyclic()) {
        if !search.run(scc) {
            break;
        }
    }

    let truncated = search.truncated;
    let cycles: Vec<Cycle<N, E>> = search
        .found
        .into_iter()
        .map(|path| build_cycle(graph, &path, limits.max_edges_per_step()))
        .collect();

    if truncated {
        warn!(
            reported = cycles.len(),
            max_cycles = limits.max_cycles(),
            "cycle enumeration stopped at the configured maximum"
        );
    } else {
        debug!(cycles = cycles.len(), "cycle enumeration complete");
    }

    Ok(Cycles { cycles, truncated })
}

fn build_cycle<N: Clone, E: Clone>(
    graph: &Graph<N, E>,
    path: &[NodeId],
    max_edges_per_step: usize,
) -> Cycle<N, E> {
    let steps = path
        .iter()
        .enumerate()
        .map(|(i, &from)| {
            let to = path[(i + 1) % path.len()];
            let mut edges = Vec::new();
            let mut total_edges = 0;
            for edge in graph.edges_between(from, to) {
                if total_edges < max_edges_per_step {
                    edges.push(edge.descriptor.clone());
                }
                total_edges += 1;
            }
            CycleStep {
                from: graph.node(from).clone(),
                to: graph.node(to).clone(),
                edges,
                total_edges,
            }
        })
        .collect();
    Cycle { steps }
}

// ---------------------------------------------------------------------------
// Johnson's algorithm
// ---------------------------------------------------------------------------

/// One DFS frame of the circuit search.
struct Frame {
    node: usize,
    next: usize,
    closed_cycle: bool,
}

/// Johnson's elementary circuit search, one SCC at a time.
///
/// Nodes are local indices into the SCC's member list. Because members are
/// sorted by node id, local order equals global order.
struct Johnson<'g, N, E> {
    graph: &'g Graph<N, E>,
    max_cycles: usize,
    found: Vec<Vec<NodeId>>,
    truncated: bool,
    /// Global node index -> local index in the current SCC.
    local: Vec<Option<usize>>,
}

impl<'g, N, E> Johnson<'g, N, E> {
    fn new(graph: &'g Graph<N, E>, max_cycles: usize) -> Self {
        Self {
            graph,
            max_cycles,
            found: Vec::new(),
            truncated: false,
            local: vec![None; graph.node_count()],
        }
    }

    /// Enumerate the cycles of one cyclic SCC.
    ///
    /// Returns `false` once the cap has been hit and the search must stop.
    fn run(&mut self, scc: &Scc) -> bool {
        let members = scc.members();
        for (i, &member) in members.iter().enumerate() {
            self.local[member.index()] = Some(i);
        }

        let adjacency: Vec<Vec<usize>> = members
            .iter()
            .map(|&member| {
                self.graph
                    .successors(member)
                    .into_iter()
                    .filter_map(|succ| self.local[succ.index()])
                    .collect()
            })
            .collect();
        let mut reverse: Vec<Vec<usize>> = vec![Vec::new(); members.len()];
        for (v, succs) in adjacency.iter().enumerate() {
            for &w in succs {
                reverse[w].push(v);
            }
        }

        let before = self.found.len();
        let mut keep_going = true;
        for start in 0..members.len() {
            let allowed = component_of_start(&adjacency, &reverse, start);
            if !self.circuits_from(start, members, &adjacency, &allowed) {
                keep_going = false;
                break;
            }
        }

        debug!(
            scc_size = members.len(),
            cycles = self.found.len() - before,
            "scc enumerated"
        );

        for &member in members {
            self.local[member.index()] = None;
        }
        keep_going
    }

    /// Find all circuits through `start` using only `allowed` nodes.
    fn circuits_from(
        &mut self,
        start: usize,
        members: &[NodeId],
        adjacency: &[Vec<usize>],
        allowed: &[bool],
    ) -> bool {
        let k = members.len();
        let mut blocked = vec![false; k];
        let mut blocked_by: Vec<Vec<usize>> = vec![Vec::new(); k];
        let mut path: Vec<usize> = vec![start];
        let mut frames = vec![Frame {
            node: start,
            next: 0,
            closed_cycle: false,
        }];
        blocked[start] = true;

        while let Some(frame) = frames.last_mut() {
            let v = frame.node;

            if let Some(&w) = adjacency[v].get(frame.next) {
                frame.next += 1;
                if !allowed[w] {
                    continue;
                }
                if w == start {
                    if self.found.len() == self.max_cycles {
                        self.truncated = true;
                        return false;
                    }
                    self.found.push(path.iter().map(|&i| members[i]).collect());
                    frame.closed_cycle = true;
                } else if !blocked[w] {
                    path.push(w);
                    blocked[w] = true;
                    frames.push(Frame {
                        node: w,
                        next: 0,
                        closed_cycle: false,
                    });
                }
                continue;
            }

            let closed = frame.closed_cycle;
            frames.pop();
            path.pop();

            if closed {
                unblock(v, &mut blocked, &mut blocked_by);
            } else {
                for &w in &adjacency[v] {
                    if allowed[w] && !blocked_by[w].contains(&v) {
                        blocked_by[w].push(v);
                    }
                }
            }

            if let Some(parent) = frames.last_mut() {
                parent.closed_cycle |= closed;
            }
        }

        true
    }
}

fn unblock(node: usize, blocked: &mut [bool], blocked_by: &mut [Vec<usize>]) {
    blocked[node] = false;
    let mut pending = vec![node];
    while let Some(u) = pending.pop() {
        for w in std::mem::take(&mut blocked_by[u]) {
            if blocked[w] {
                blocked[w] = false;
                pending.push(w);
            }
        }
    }
}

/// Nodes in the strongly connected component of `start` within the subgraph
/// induced by nodes `>= start`.
///
/// Every circuit whose smallest node is `start` lies inside this set.
fn component_of_start(adjacency: &[Vec<usize>], reverse: &[Vec<usize>], start: usize) -> Vec<bool> {
    let forward = reach(adjacency, start);
    let backward = reach(reverse, start);
    forward
        .iter()
        .zip(&backward)
        .map(|(&f, &b)| f && b)
        .collect()
}

fn reach(adjacency: &[Vec<usize>], start: usize) -> Vec<bool> {
    let mut seen = vec![false; adjacency.len()];
    seen[start] = true;
    let mut pending = vec![start];
    while let Some(v) = pending.pop() {
        for &w in &adjacency[v] {
            if w >= start && !seen[w] {
                seen[w] = true;
                pending.push(w);
            }
        }
    }
    seen
}
