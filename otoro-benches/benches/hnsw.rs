//! Parallel-build and search benchmarks for the concurrent HNSW engine.
#![allow(missing_docs, reason = "Criterion macros generate undocumented items")]
#![allow(
    clippy::expect_used,
    reason = "benchmark setup is infallible for valid constants"
)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use otoro_benches::{SyntheticConfig, synthetic_queries, synthetic_vectors};
use otoro_core::{
    HnswBuilder, HnswParams, SearchRequest, SimilarityFunction, VectorEncoding, VectorRef, search,
};

/// Seed used for all synthetic data generation in this benchmark.
const SEED: u64 = 42;

/// Vector dimensionality for all benchmark datasets.
const DIMENSIONS: usize = 64;

/// Dataset sizes to benchmark.
const POINT_COUNTS: &[usize] = &[1_000, 5_000];

/// Neighbour fan-out values to benchmark.
const MAX_CONNECTIONS: &[usize] = &[8, 16];

fn hnsw_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("hnsw_build");
    group.sample_size(10);

    for &point_count in POINT_COUNTS {
        let config = SyntheticConfig {
            point_count,
            dimensions: DIMENSIONS,
            seed: SEED,
        };
        let vectors = synthetic_vectors(&config).expect("synthetic corpus must generate");

        for &m in MAX_CONNECTIONS {
            group.bench_with_input(
                BenchmarkId::new(format!("m{m}"), point_count),
                &point_count,
                |b, _| {
                    b.iter(|| {
                        let params = HnswParams::new(m, m * 4)
                            .expect("benchmark parameters must be valid")
                            .with_rng_seed(SEED);
                        let builder = HnswBuilder::new(
                            vectors.clone(),
                            VectorEncoding::Float32,
                            SimilarityFunction::DotProduct,
                            params,
                        )
                        .expect("builder construction must succeed");
                        builder.build().expect("benchmark build must succeed");
                        builder.into_graph()
                    });
                },
            );
        }
    }
    group.finish();
}

fn hnsw_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("hnsw_search");

    let config = SyntheticConfig {
        point_count: 5_000,
        dimensions: DIMENSIONS,
        seed: SEED,
    };
    let vectors = synthetic_vectors(&config).expect("synthetic corpus must generate");
    let params = HnswParams::new(16, 64)
        .expect("benchmark parameters must be valid")
        .with_rng_seed(SEED);
    let builder = HnswBuilder::new(
        vectors.clone(),
        VectorEncoding::Float32,
        SimilarityFunction::DotProduct,
        params,
    )
    .expect("builder construction must succeed");
    builder.build().expect("benchmark build must succeed");
    let graph = builder.graph();
    let queries = synthetic_queries(&config, 64);

    for &top_k in &[10usize, 100] {
        group.bench_with_input(BenchmarkId::new("top_k", top_k), &top_k, |b, &top_k| {
            let mut cursor = 0usize;
            b.iter(|| {
                let query = &queries[cursor % queries.len()];
                cursor += 1;
                search(SearchRequest {
                    query: VectorRef::F32(query),
                    top_k,
                    vectors: &vectors,
                    similarity: SimilarityFunction::DotProduct,
                    graph,
                    accept: None,
                    visit_limit: usize::MAX,
                })
                .expect("benchmark search must succeed")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, hnsw_build, hnsw_search);
criterion_main!(benches);
