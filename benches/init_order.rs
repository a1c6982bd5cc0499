use appgen::{DependencyMap, InitOrderResolver};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Layered graph: every component depends on up to three from the layer before
fn layered(components: usize) -> DependencyMap {
    (0..components)
        .map(|i| {
            let layer_start = (i / 10).saturating_sub(1) * 10;
            let deps: Vec<String> = if i < 10 {
                Vec::new()
            } else {
                (0..3).map(|k| format!("c{:05}", layer_start + (i + k) % 10)).collect()
            };
            (format!("c{i:05}"), deps)
        })
        .collect()
}

/// Single chain, the longest active path the resolver sees
fn chain(components: usize) -> DependencyMap {
    (0..components)
        .map(|i| {
            let deps: Vec<String> = match i {
                0 => Vec::new(),
                _ => vec![format!("c{:05}", i - 1)],
            };
            (format!("c{i:05}"), deps)
        })
        .collect()
}

fn benchmark_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for size in [10, 100, 1_000] {
        let graph = layered(size);
        group.bench_with_input(BenchmarkId::new("layered", size), &graph, |b, graph| {
            b.iter(|| InitOrderResolver::resolve(black_box(graph)))
        });

        let graph = chain(size);
        group.bench_with_input(BenchmarkId::new("chain", size), &graph, |b, graph| {
            b.iter(|| InitOrderResolver::resolve(black_box(graph)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_resolve);
criterion_main!(benches);
