//! Shared test utilities used across otoro crates.
//!
//! The helpers here are deliberately independent of `otoro-core` so the core
//! crate can take this one as a dev-dependency without a cycle. Datasets are
//! produced as plain `Vec<Vec<f32>>` matrices; callers wrap them in whatever
//! provider type they are exercising.

pub mod datasets {
    //! Deterministic dataset generators for engine tests and benchmarks.

    use rand::{Rng, SeedableRng, rngs::SmallRng};

    /// Returns `count` unit vectors spread over the upper semicircle, with
    /// point `i` at angle `i / count * π`.
    ///
    /// The layout gives every node an unambiguous nearest-neighbour ordering
    /// by index distance, which makes recall assertions readable.
    ///
    /// # Examples
    /// ```
    /// use otoro_test_support::datasets::circular_unit_vectors;
    ///
    /// let points = circular_unit_vectors(4);
    /// assert_eq!(points.len(), 4);
    /// assert!((points[0][0] - 1.0).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn circular_unit_vectors(count: usize) -> Vec<Vec<f32>> {
        (0..count)
            .map(|i| {
                let angle = std::f64::consts::PI * (i as f64) / (count as f64);
                vec![angle.cos() as f32, angle.sin() as f32]
            })
            .collect()
    }

    /// Returns a unit vector at `fraction * π` on the same semicircle as
    /// [`circular_unit_vectors`].
    #[must_use]
    pub fn unit_vector_at(fraction: f64) -> Vec<f32> {
        let angle = std::f64::consts::PI * fraction;
        vec![angle.cos() as f32, angle.sin() as f32]
    }

    /// Generates `count` vectors of `dimensions` components drawn uniformly
    /// from `[-1, 1)` with a seeded [`SmallRng`], then normalised to unit
    /// length so dot-product similarity behaves as a proper angle measure.
    ///
    /// # Examples
    /// ```
    /// use otoro_test_support::datasets::uniform_unit_vectors;
    ///
    /// let a = uniform_unit_vectors(3, 8, 7);
    /// let b = uniform_unit_vectors(3, 8, 7);
    /// assert_eq!(a, b, "generation must be deterministic per seed");
    /// ```
    #[must_use]
    pub fn uniform_unit_vectors(count: usize, dimensions: usize, seed: u64) -> Vec<Vec<f32>> {
        let mut rng = SmallRng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                let mut vector: Vec<f32> =
                    (0..dimensions).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
                normalise(&mut vector);
                vector
            })
            .collect()
    }

    fn normalise(vector: &mut [f32]) {
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for component in vector.iter_mut() {
                *component /= norm;
            }
        } else {
            // Degenerate draw; fall back to a basis vector so the dataset
            // stays on the unit sphere.
            if let Some(first) = vector.first_mut() {
                *first = 1.0;
            }
        }
    }
}

pub mod oracle {
    //! Brute-force reference answers for recall assertions.

    /// Returns the ids of the `k` highest-scoring rows under `score`, best
    /// first, ties broken towards the smaller id.
    ///
    /// # Examples
    /// ```
    /// use otoro_test_support::oracle::exact_top_k;
    ///
    /// let scores = [0.1f32, 0.9, 0.4];
    /// let top = exact_top_k(3, 2, |id| scores[id]);
    /// assert_eq!(top, vec![1, 2]);
    /// ```
    pub fn exact_top_k(count: usize, k: usize, mut score: impl FnMut(usize) -> f32) -> Vec<usize> {
        let mut scored: Vec<(usize, f32)> = (0..count).map(|id| (id, score(id))).collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(k);
        scored.into_iter().map(|(id, _)| id).collect()
    }

    /// Fraction of `approximate` ids that also appear in `exact`.
    #[must_use]
    pub fn overlap_fraction(approximate: &[usize], exact: &[usize]) -> f64 {
        if exact.is_empty() {
            return 1.0;
        }
        let hits = approximate.iter().filter(|id| exact.contains(id)).count();
        hits as f64 / exact.len() as f64
    }
}

pub mod tracing_init {
    //! Subscriber installation for tests that assert on log behaviour.

    /// Installs a compact fmt subscriber once per process; later calls are
    /// no-ops so parallel test binaries do not race on the global default.
    pub fn init() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .compact()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::{datasets, oracle};

    #[test]
    fn circular_vectors_are_unit_length() {
        for point in datasets::circular_unit_vectors(16) {
            let norm: f32 = point.iter().map(|v| v * v).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5, "non-unit point: {point:?}");
        }
    }

    #[test]
    fn uniform_vectors_are_unit_length() {
        for point in datasets::uniform_unit_vectors(8, 32, 99) {
            let norm: f32 = point.iter().map(|v| v * v).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-4, "non-unit point: {point:?}");
        }
    }

    #[test]
    fn exact_top_k_breaks_ties_towards_smaller_id() {
        let scores = [0.5f32, 0.5, 0.5, 0.1];
        assert_eq!(oracle::exact_top_k(4, 2, |id| scores[id]), vec![0, 1]);
    }
}
