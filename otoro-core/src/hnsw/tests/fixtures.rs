//! Shared fixtures and helpers for HNSW tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::ProviderError;
use crate::hnsw::{HnswBuilder, HnswParams, VectorCursors};
use crate::provider::{VectorEncoding, VectorProvider, VectorRef};
use crate::similarity::SimilarityFunction;

/// In-memory `f32` provider used across the engine tests.
#[derive(Clone, Debug)]
pub(super) struct FloatVectors {
    data: Arc<Vec<Vec<f32>>>,
    dimension: usize,
}

impl FloatVectors {
    pub(super) fn new(data: Vec<Vec<f32>>) -> Self {
        let dimension = data.first().map_or(0, Vec::len);
        Self {
            data: Arc::new(data),
            dimension,
        }
    }
}

impl VectorProvider for FloatVectors {
    fn size(&self) -> usize {
        self.data.len()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn encoding(&self) -> VectorEncoding {
        VectorEncoding::Float32
    }

    fn vector(&self, ordinal: usize) -> Result<VectorRef<'_>, ProviderError> {
        self.data
            .get(ordinal)
            .map(|row| VectorRef::F32(row))
            .ok_or(ProviderError::OutOfBounds { ordinal })
    }

    fn copy(&self) -> Result<Self, ProviderError> {
        Ok(self.clone())
    }
}

/// Provider that sleeps on every read so concurrent insertions overlap.
#[derive(Clone, Debug)]
pub(super) struct DelayedVectors {
    inner: FloatVectors,
    delay: Duration,
    reads: Arc<AtomicUsize>,
}

impl DelayedVectors {
    pub(super) fn new(data: Vec<Vec<f32>>, delay: Duration) -> Self {
        Self {
            inner: FloatVectors::new(data),
            delay,
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(super) fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

impl VectorProvider for DelayedVectors {
    fn size(&self) -> usize {
        self.inner.size()
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn encoding(&self) -> VectorEncoding {
        VectorEncoding::Float32
    }

    fn vector(&self, ordinal: usize) -> Result<VectorRef<'_>, ProviderError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        std::thread::sleep(self.delay);
        self.inner.vector(ordinal)
    }

    fn copy(&self) -> Result<Self, ProviderError> {
        Ok(self.clone())
    }
}

/// Builds a graph by inserting ordinals `0..size` in order on one thread,
/// which the diversity scenarios rely on.
pub(super) fn build_in_order(
    data: Vec<Vec<f32>>,
    similarity: SimilarityFunction,
    m: usize,
    beam_width: usize,
) -> HnswBuilder<FloatVectors> {
    let vectors = FloatVectors::new(data);
    let params = HnswParams::new(m, beam_width)
        .expect("test parameters must be valid")
        .with_rng_seed(42);
    let builder = HnswBuilder::new(
        vectors.clone(),
        VectorEncoding::Float32,
        similarity,
        params,
    )
    .expect("builder construction must succeed");
    let cursors = VectorCursors::new(&vectors).expect("cursor setup must succeed");
    for node in 0..vectors.size() {
        builder
            .insert(node, &cursors)
            .expect("sequential insert must succeed");
    }
    builder
}

/// Asserts a neighbour set holds exactly `expected` (order-insensitive).
pub(super) fn assert_neighbour_ids(
    builder: &HnswBuilder<FloatVectors>,
    node: usize,
    expected: &[usize],
) {
    let mut ids = builder
        .graph()
        .neighbours(0, node)
        .expect("node must exist at level 0")
        .nodes();
    ids.sort_unstable();
    let mut wanted = expected.to_vec();
    wanted.sort_unstable();
    assert_eq!(ids, wanted, "level-0 neighbours of {node}");
}
