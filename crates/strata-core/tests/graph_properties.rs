use proptest::prelude::*;
use strata_core::{Graph, NodeId};

/// Node list with repeats, plus edges whose endpoints are drawn from it.
/// Each edge carries its input position as descriptor.
fn arb_graph_input() -> impl Strategy<Value = (Vec<u8>, Vec<(u8, u8, usize)>)> {
    prop::collection::vec(0u8..12, 1..24).prop_flat_map(|nodes| {
        let pick = prop::sample::select(nodes.clone());
        let edges = prop::collection::vec((pick.clone(), pick), 0..48).prop_map(|pairs| {
            pairs
                .into_iter()
                .enumerate()
                .map(|(position, (from, to))| (from, to, position))
                .collect::<Vec<_>>()
        });
        (Just(nodes), edges)
    })
}

fn build(nodes: &[u8], edges: &[(u8, u8, usize)]) -> Graph<u8, usize> {
    Graph::new(nodes.iter().copied(), edges.iter().copied())
        .unwrap_or_else(|e| panic!("generated graph rejected: {e}"))
}

fn id(graph: &Graph<u8, usize>, node: u8) -> NodeId {
    graph
        .node_id(&node)
        .unwrap_or_else(|| panic!("node {node} missing"))
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn duplicate_nodes_collapse_to_first_occurrence((nodes, edges) in arb_graph_input()) {
        let graph = build(&nodes, &edges);

        let mut expected: Vec<u8> = Vec::new();
        for node in &nodes {
            if !expected.contains(node) {
                expected.push(*node);
            }
        }
        let interned: Vec<u8> = graph.nodes().map(|(_, n)| *n).collect();
        prop_assert_eq!(interned, expected);
    }

    #[test]
    fn parallel_edges_keep_input_order((nodes, edges) in arb_graph_input()) {
        let graph = build(&nodes, &edges);
        prop_assert_eq!(graph.edge_count(), edges.len());

        for &(from, to, _) in &edges {
            let expected: Vec<usize> = edges
                .iter()
                .filter(|&&(f, t, _)| f == from && t == to)
                .map(|&(_, _, position)| position)
                .collect();
            let actual: Vec<usize> = graph
                .edges_between(id(&graph, from), id(&graph, to))
                .map(|edge| edge.descriptor)
                .collect();
            prop_assert_eq!(actual, expected);
        }
    }

    #[test]
    fn successors_are_distinct_in_first_edge_order((nodes, edges) in arb_graph_input()) {
        let graph = build(&nodes, &edges);

        for (node_id, node) in graph.nodes() {
            let mut expected: Vec<u8> = Vec::new();
            for &(from, to, _) in &edges {
                if from == *node && !expected.contains(&to) {
                    expected.push(to);
                }
            }
            let actual: Vec<u8> = graph
                .successors(node_id)
                .into_iter()
                .map(|successor| *graph.node(successor))
                .collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
