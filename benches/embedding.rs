//! Benchmarks for walk generation and skip-gram training

use criterion::{criterion_group, criterion_main, Criterion};

use citebench::embedding::{generate_walks, SkipGram, SkipGramConfig, WalkConfig};
use citebench::graph::CitationGraph;

fn bench_graph(n: usize) -> CitationGraph {
    // Ring plus chords for nontrivial neighborhoods
    let mut edges: Vec<(usize, usize)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    edges.extend((0..n).map(|i| (i, (i + 7) % n)));
    CitationGraph::from_edges(n, &edges)
}

fn bench_walks(c: &mut Criterion) {
    let graph = bench_graph(500);
    let config = WalkConfig {
        walk_length: 40,
        num_walks: 4,
        ..Default::default()
    };
    c.bench_function("generate_walks_500", |b| {
        b.iter(|| generate_walks(&graph, &config))
    });
}

fn bench_skipgram(c: &mut Criterion) {
    let graph = bench_graph(200);
    let walks = generate_walks(
        &graph,
        &WalkConfig {
            walk_length: 20,
            num_walks: 2,
            ..Default::default()
        },
    );
    let config = SkipGramConfig {
        dim: 32,
        epochs: 1,
        ..Default::default()
    };
    c.bench_function("skipgram_train_200", |b| {
        b.iter(|| {
            let mut model = SkipGram::new(200, config.clone());
            model.train(&walks);
            model.embeddings().sum()
        })
    });
}

criterion_group!(benches, bench_walks, bench_skipgram);
criterion_main!(benches);
