//! Synthetic dataset helpers shared by the otoro benchmarks.

use rand::{Rng, SeedableRng, rngs::SmallRng};

use otoro_core::ProviderError;
use otoro_providers_dense::DenseF32Vectors;

/// Configuration for synthetic benchmark corpora.
#[derive(Clone, Copy, Debug)]
pub struct SyntheticConfig {
    /// Number of vectors to generate.
    pub point_count: usize,
    /// Components per vector.
    pub dimensions: usize,
    /// RNG seed, so benchmark runs are comparable.
    pub seed: u64,
}

/// Generates a unit-normalised corpus for build and search benchmarks.
///
/// # Errors
/// Propagates provider validation failures (never expected for generated
/// rows).
pub fn synthetic_vectors(config: &SyntheticConfig) -> Result<DenseF32Vectors, ProviderError> {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let rows = (0..config.point_count)
        .map(|_| {
            let mut row: Vec<f32> = (0..config.dimensions)
                .map(|_| rng.gen_range(-1.0f32..1.0))
                .collect();
            let norm = row.iter().map(|v| v * v).sum::<f32>().sqrt().max(f32::EPSILON);
            for value in &mut row {
                *value /= norm;
            }
            row
        })
        .collect();
    DenseF32Vectors::try_new(rows)
}

/// Generates seeded query vectors matching `config`'s dimensionality.
#[must_use]
pub fn synthetic_queries(config: &SyntheticConfig, count: usize) -> Vec<Vec<f32>> {
    let mut rng = SmallRng::seed_from_u64(config.seed.wrapping_add(1));
    (0..count)
        .map(|_| {
            (0..config.dimensions)
                .map(|_| rng.gen_range(-1.0f32..1.0))
                .collect()
        })
        .collect()
}
