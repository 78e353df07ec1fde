use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strata_analytics::{detect_cycles, lakos_metrics};
use strata_core::{ComponentGraph, CycleLimits, Graph, MetricsComponent, MetricsComponents};

struct Tier {
    name: &'static str,
    nodes: u32,
    edges_per_node: u32,
}

const TIERS: [Tier; 3] = [
    Tier {
        name: "sparse_200",
        nodes: 200,
        edges_per_node: 2,
    },
    Tier {
        name: "dense_60",
        nodes: 60,
        edges_per_node: 12,
    },
    Tier {
        name: "dense_400",
        nodes: 400,
        edges_per_node: 8,
    },
];

fn synthetic_graph(tier: &Tier, seed: u64) -> Graph<u32, u32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let edges: Vec<(u32, u32, u32)> = (0..tier.nodes * tier.edges_per_node)
        .map(|i| (rng.gen_range(0..tier.nodes), rng.gen_range(0..tier.nodes), i))
        .collect();
    Graph::new(0..tier.nodes, edges).expect("synthetic endpoints are in range")
}

fn bench_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycles.tiered");

    for tier in &TIERS {
        let graph = synthetic_graph(tier, 0x5752_A7A0_u64 + u64::from(tier.nodes));
        group.throughput(Throughput::Elements(graph.edge_count() as u64));

        for max_cycles in [100_i64, 1_000] {
            let limits = CycleLimits::new(max_cycles, 20).expect("positive limits");
            group.bench_with_input(
                BenchmarkId::new(format!("detect_{max_cycles}"), tier.name),
                &graph,
                |b, graph| b.iter(|| black_box(detect_cycles(graph, &limits))),
            );
        }
    }

    group.finish();
}

fn bench_lakos(c: &mut Criterion) {
    let mut group = c.benchmark_group("lakos.tiered");

    for tier in &TIERS {
        let graph = synthetic_graph(tier, 0x1A_C05_u64 + u64::from(tier.nodes));
        let components = MetricsComponents::new(
            (0..tier.nodes).map(|i| MetricsComponent::new(format!("c{i}"), [i])),
        )
        .expect("unique ids");
        let component_graph = ComponentGraph::from_element_dependencies(
            &components,
            graph
                .edges()
                .map(|(_, edge)| (graph.node(edge.source), graph.node(edge.target))),
        );

        group.bench_with_input(
            BenchmarkId::new("lakos", tier.name),
            &component_graph,
            |b, component_graph| b.iter(|| black_box(lakos_metrics(component_graph))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_cycles, bench_lakos);
criterion_main!(benches);
