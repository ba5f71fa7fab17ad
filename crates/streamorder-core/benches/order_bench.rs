//! # Order Benchmarks
//!
//! Engine throughput over chains and balanced binary trees.
//!
//! Run with: `cargo bench -p streamorder-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use streamorder_core::{
    AdjacencyIndex, ArcId, EngineKind, EngineSettings, Network, NodeId, ShreveIterative,
};

/// Single channel of `length` arcs; the last arc is the sink.
fn create_chain(length: u64) -> (Network, ArcId, NodeId) {
    let mut network = Network::new();
    for node in 0..length {
        network.add_arc(NodeId(node), NodeId(node + 1));
    }
    (network, ArcId(length - 1), NodeId(length - 1))
}

/// Balanced binary tree of the given depth, rooted at sink arc 1 → 0.
fn create_binary_tree(depth: u32) -> (Network, ArcId, NodeId) {
    let mut network = Network::new();
    let sink = network.add_arc(NodeId(1), NodeId(0));

    let mut frontier = vec![NodeId(1)];
    let mut next_node = 2u64;
    for _ in 0..depth {
        let mut next = Vec::with_capacity(frontier.len() * 2);
        for node in frontier {
            for _ in 0..2 {
                let upstream = NodeId(next_node);
                next_node += 1;
                network.add_arc(upstream, node);
                next.push(upstream);
            }
        }
        frontier = next;
    }

    (network, sink, NodeId(1))
}

const ENGINES: [EngineKind; 3] = [
    EngineKind::Strahler,
    EngineKind::Shreve,
    EngineKind::ShreveIterative,
];

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain");

    // Recursive engines stop at the default depth bound.
    for length in [100u64, 500, 1000].iter() {
        let (network, sink, at_node) = create_chain(*length);
        let adjacency = AdjacencyIndex::from_network(&network);

        for kind in ENGINES {
            let engine = kind.build(&EngineSettings::default());
            group.bench_with_input(BenchmarkId::new(kind.as_str(), length), length, |b, _| {
                b.iter(|| {
                    let mut copy = network.clone();
                    let order = engine.compute(&mut copy, &adjacency, sink, at_node);
                    black_box(order)
                });
            });
        }
    }

    group.finish();
}

fn bench_binary_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary_tree");

    for depth in [6u32, 10, 14].iter() {
        let (network, sink, at_node) = create_binary_tree(*depth);
        let adjacency = AdjacencyIndex::from_network(&network);

        for kind in ENGINES {
            let engine = kind.build(&EngineSettings::default());
            group.bench_with_input(BenchmarkId::new(kind.as_str(), depth), depth, |b, _| {
                b.iter(|| {
                    let mut copy = network.clone();
                    let order = engine.compute(&mut copy, &adjacency, sink, at_node);
                    black_box(order)
                });
            });
        }
    }

    group.finish();
}

fn bench_deep_iterative(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_iterative");
    group.sample_size(10);

    for length in [100_000u64, 1_000_000].iter() {
        let (network, sink, at_node) = create_chain(*length);
        let adjacency = AdjacencyIndex::from_network(&network);

        group.bench_with_input(BenchmarkId::from_parameter(length), length, |b, _| {
            b.iter(|| {
                let mut copy = network.clone();
                let outcome = ShreveIterative::default().run(&mut copy, &adjacency, sink, at_node);
                black_box(outcome)
            });
        });
    }

    group.finish();
}

fn bench_adjacency_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjacency_build");

    for depth in [10u32, 14].iter() {
        let (network, _, _) = create_binary_tree(*depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, _| {
            b.iter(|| black_box(AdjacencyIndex::from_network(&network)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_chain,
    bench_binary_tree,
    bench_deep_iterative,
    bench_adjacency_build
);
criterion_main!(benches);
