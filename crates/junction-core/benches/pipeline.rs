use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use junction_core::{NetworkDescription, PipelineConfig, VarId, build_junction_tree};

/// Sizes of the layered networks: (name, layers, width).
const TIERS: &[(&str, u32, u32)] = &[("small", 4, 4), ("medium", 8, 8), ("large", 12, 12)];

/// Layered DAG where every variable draws up to three parents from the
/// previous layer. A fixed LCG seed keeps the shape identical across runs.
fn layered_network(layers: u32, width: u32, seed: u64) -> NetworkDescription {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 33) as u32
    };

    let ids: Vec<VarId> = (0..layers * width).collect();
    let mut edges = Vec::new();
    for layer in 1..layers {
        for col in 0..width {
            let child = layer * width + col;
            for _ in 0..3 {
                let parent = (layer - 1) * width + next() % width;
                edges.push((parent, child));
            }
        }
    }
    NetworkDescription::from_edges(ids, &edges)
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline.layered");

    for &(name, layers, width) in TIERS {
        let desc = layered_network(layers, width, 0x5EED_u64 + u64::from(layers));
        group.throughput(Throughput::Elements(u64::from(layers * width)));

        group.bench_with_input(BenchmarkId::new("verified", name), &desc, |b, desc| {
            b.iter(|| black_box(build_junction_tree(desc, &PipelineConfig::default())))
        });

        let unverified = PipelineConfig {
            verify: false,
            ..PipelineConfig::default()
        };
        group.bench_with_input(BenchmarkId::new("unverified", name), &desc, |b, desc| {
            b.iter(|| black_box(build_junction_tree(desc, &unverified)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
