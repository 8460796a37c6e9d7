//! Concurrent graph construction.
//!
//! The builder inserts one node at a time: draw the node's top level, walk
//! down from the entry point with a single-candidate search, collect a beam
//! of candidates on each level the node occupies, link diversely, and
//! backlink reciprocally. Parallel builds run the same per-node routine from
//! a rayon pool; coordination happens entirely through the graph's
//! compare-and-swap cells, so writers never block each other.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::error::ProviderError;
use crate::memory::{format_bytes, neighbour_set_bytes};
use crate::provider::{VectorEncoding, VectorProvider};
use crate::similarity::SimilarityFunction;

use super::error::HnswError;
use super::graph::HnswGraph;
use super::params::HnswParams;
use super::search::LevelSearch;
use super::types::Neighbour;

/// A pair of independent provider cursors.
///
/// Scoring one stored vector against another needs two simultaneous reads,
/// so every inserting thread carries its own cursor pair.
#[derive(Debug)]
pub struct VectorCursors<P> {
    primary: P,
    secondary: P,
}

impl<P: VectorProvider> VectorCursors<P> {
    /// Opens a cursor pair over `provider`.
    ///
    /// # Errors
    /// Propagates [`ProviderError`] from [`VectorProvider::copy`].
    pub fn new(provider: &P) -> Result<Self, ProviderError> {
        Ok(Self {
            primary: provider.copy()?,
            secondary: provider.copy()?,
        })
    }
}

/// Cooperative cancellation handle for a parallel build.
///
/// Cancellation is observed between node insertions, never inside one, so a
/// cancelled build leaves only whole nodes behind.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Requests cancellation of the build sharing this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Concurrent HNSW graph builder over a vector provider.
///
/// # Examples
/// ```
/// use otoro_core::{HnswBuilder, HnswParams, SimilarityFunction, VectorEncoding};
/// # use otoro_core::{HnswError, ProviderError, VectorProvider, VectorRef};
/// # #[derive(Clone)]
/// # struct Flat(Vec<f32>);
/// # impl VectorProvider for Flat {
/// #     fn size(&self) -> usize { self.0.len() }
/// #     fn dimension(&self) -> usize { 1 }
/// #     fn encoding(&self) -> VectorEncoding { VectorEncoding::Float32 }
/// #     fn vector(&self, ordinal: usize) -> Result<VectorRef<'_>, ProviderError> {
/// #         self.0.get(ordinal..=ordinal).map(VectorRef::F32).ok_or(ProviderError::OutOfBounds { ordinal })
/// #     }
/// #     fn copy(&self) -> Result<Self, ProviderError> { Ok(self.clone()) }
/// # }
/// let vectors = Flat(vec![0.0, 1.0, 2.0]);
/// let params = HnswParams::new(2, 8)?;
/// let builder = HnswBuilder::new(
///     vectors,
///     VectorEncoding::Float32,
///     SimilarityFunction::Euclidean,
///     params,
/// )?;
/// builder.build()?;
/// assert_eq!(builder.graph().size(), 3);
/// # Ok::<(), HnswError>(())
/// ```
#[derive(Debug)]
pub struct HnswBuilder<P: VectorProvider> {
    params: HnswParams,
    similarity: SimilarityFunction,
    vectors: P,
    graph: HnswGraph,
    token: CancellationToken,
}

impl<P: VectorProvider> HnswBuilder<P> {
    /// Creates a builder over `vectors`.
    ///
    /// # Errors
    /// Returns [`HnswError::InvalidParameters`] when the provider's encoding
    /// disagrees with `encoding` or the provider reports zero
    /// dimensionality; propagates provider failures from cursor setup.
    pub fn new(
        vectors: P,
        encoding: VectorEncoding,
        similarity: SimilarityFunction,
        params: HnswParams,
    ) -> Result<Self, HnswError> {
        if vectors.encoding() != encoding {
            return Err(HnswError::InvalidParameters {
                reason: "provider encoding does not match the requested encoding".into(),
            });
        }
        if vectors.dimension() == 0 {
            return Err(HnswError::InvalidParameters {
                reason: "vector dimensionality must be greater than zero".into(),
            });
        }
        let graph = HnswGraph::new(params.max_connections())?;
        Ok(Self {
            params,
            similarity,
            vectors,
            graph,
            token: CancellationToken::default(),
        })
    }

    /// Creates a builder whose graph starts as `initializer` with node ids
    /// remapped through `ordinal_map`.
    ///
    /// The map must cover every initializer node, be injective, and be
    /// monotone (strictly increasing new ids over increasing old ids), so
    /// the initializer's neighbour orderings survive remapping verbatim.
    /// Normal insertion proceeds afterwards; every mapped node is present in
    /// the final graph.
    ///
    /// # Errors
    /// Returns [`HnswError::InvalidParameters`] for an incomplete or
    /// non-monotone map, plus everything [`HnswBuilder::new`] rejects.
    pub fn from_graph(
        vectors: P,
        encoding: VectorEncoding,
        similarity: SimilarityFunction,
        params: HnswParams,
        initializer: &HnswGraph,
        ordinal_map: &BTreeMap<usize, usize>,
    ) -> Result<Self, HnswError> {
        let builder = Self::new(vectors, encoding, similarity, params)?;
        validate_ordinal_map(ordinal_map)?;
        let remap = |old: usize| -> Result<usize, HnswError> {
            ordinal_map
                .get(&old)
                .copied()
                .ok_or_else(|| HnswError::InvalidParameters {
                    reason: format!("ordinal map is missing initializer node {old}"),
                })
        };
        for level in 0..initializer.num_levels() {
            for old in initializer.nodes_on_level(level) {
                builder.graph.add_node(level, remap(old)?);
            }
        }
        for level in 0..initializer.num_levels() {
            for old in initializer.nodes_on_level(level) {
                let new = remap(old)?;
                let Some(source) = initializer.neighbours(level, old) else {
                    continue;
                };
                let mut remapped = Vec::new();
                for member in source.neighbours() {
                    remapped.push(Neighbour {
                        id: remap(member.id)?,
                        score: member.score,
                    });
                }
                if let Some(target) = builder.graph.neighbours(level, new) {
                    target.seed(remapped);
                }
            }
        }
        if let Some(entry) = initializer.entry() {
            builder.graph.try_set_initial_entry(remap(entry.node)?, entry.level);
        }
        Ok(builder)
    }

    /// Returns the graph under construction.
    #[must_use]
    pub fn graph(&self) -> &HnswGraph {
        &self.graph
    }

    /// Consumes the builder, yielding the graph.
    #[must_use]
    pub fn into_graph(self) -> HnswGraph {
        self.graph
    }

    /// Returns a handle that cancels an in-flight [`HnswBuilder::build`].
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Inserts one node, returning the estimated graph-heap growth in
    /// bytes.
    ///
    /// Safe to call from many threads for distinct nodes; re-inserting an
    /// already-present node is a structural no-op. On provider failure the
    /// node may be left with empty or partial neighbour lists; the graph
    /// remains searchable but a rebuild is needed for full quality.
    ///
    /// # Errors
    /// Propagates provider and similarity failures.
    pub fn insert(&self, node: usize, cursors: &VectorCursors<P>) -> Result<i64, HnswError> {
        let level = self.params.assign_level(node);
        for current in 0..=level {
            self.graph.add_node(current, node);
        }
        let bytes: i64 = (0..=level)
            .map(|current| neighbour_set_bytes(self.graph.max_connections_for_level(current)) as i64)
            .sum();

        if self.graph.try_set_initial_entry(node, level) {
            return Ok(bytes);
        }
        let entry = self
            .graph
            .entry()
            .ok_or_else(|| HnswError::GraphInvariantViolation {
                message: "entry point vanished after initialisation".into(),
            })?;

        let scorer = InsertScorer {
            cursors,
            similarity: self.similarity,
        };
        let mut score_to_node = |other: usize| scorer.between(node, other);
        let pair = |left: usize, right: usize| scorer.between(left, right);

        // Greedy descent through the levels the new node does not occupy.
        let mut entry_points = vec![entry.node];
        for current in ((level + 1)..=entry.level).rev() {
            let descent = LevelSearch {
                level: current,
                width: 1,
                entry_points: &entry_points,
                accept: None,
                visit_limit: usize::MAX,
            };
            let found = descent.run(&self.graph, &mut score_to_node)?;
            let best = found.nodes();
            if !best.is_empty() {
                entry_points = best;
            }
        }

        // Beam search and linking on every level the node occupies.
        for current in (0..=level.min(entry.level)).rev() {
            let beam = LevelSearch {
                level: current,
                width: self.params.beam_width(),
                entry_points: &entry_points,
                accept: None,
                visit_limit: usize::MAX,
            };
            let found = beam.run(&self.graph, &mut score_to_node)?;
            let candidates = found.entries();
            let set = self
                .graph
                .neighbours(current, node)
                .ok_or_else(|| HnswError::GraphInvariantViolation {
                    message: format!("missing neighbour slot for node {node} at level {current}"),
                })?;
            let accepted = set.insert_diverse(&candidates, &pair)?;
            for member in &accepted {
                if let Some(theirs) = self.graph.neighbours(current, member.id) {
                    theirs.insert_reciprocal(node, member.score, &pair)?;
                }
            }
            let next_entries = found.nodes();
            if !next_entries.is_empty() {
                entry_points = next_entries;
            }
        }

        if level > entry.level {
            self.graph.try_promote_entry(node, level);
        }
        Ok(bytes)
    }

    /// Inserts every provider ordinal through the rayon pool.
    ///
    /// Each worker opens its own cursor pair; work distribution is rayon's
    /// usual stealing, so stragglers with high level draws do not serialise
    /// the batch. Cancellation via [`HnswBuilder::cancellation_token`] is
    /// checked between insertions and surfaces as
    /// [`HnswError::Cancelled`].
    ///
    /// # Errors
    /// Returns the first insertion failure; remaining queued insertions are
    /// abandoned.
    pub fn build(&self) -> Result<(), HnswError>
    where
        P: Sync,
    {
        let total = self.vectors.size();
        tracing::debug!(total, seed = self.params.rng_seed(), "starting graph build");
        (0..total).into_par_iter().try_for_each_init(
            || VectorCursors::new(&self.vectors),
            |cursors, node| {
                if self.token.is_cancelled() {
                    tracing::warn!(node, "graph build cancelled");
                    return Err(HnswError::Cancelled);
                }
                let cursors = cursors.as_ref().map_err(|error| HnswError::from(error.clone()))?;
                self.insert(node, cursors).map(|_| ())
            },
        )?;
        tracing::debug!(
            total,
            ram = %format_bytes(self.graph.ram_bytes_used()),
            "graph build complete"
        );
        Ok(())
    }
}

struct InsertScorer<'a, P> {
    cursors: &'a VectorCursors<P>,
    similarity: SimilarityFunction,
}

impl<P: VectorProvider> InsertScorer<'_, P> {
    fn between(&self, left: usize, right: usize) -> Result<f32, HnswError> {
        let a = self.cursors.primary.vector(left)?;
        let b = self.cursors.secondary.vector(right)?;
        self.similarity
            .compare(a, b)
            .map_err(|source| HnswError::Similarity { left, right, source })
    }
}

fn validate_ordinal_map(ordinal_map: &BTreeMap<usize, usize>) -> Result<(), HnswError> {
    let mut previous: Option<usize> = None;
    for (&old, &new) in ordinal_map {
        if let Some(last) = previous {
            if new <= last {
                return Err(HnswError::InvalidParameters {
                    reason: format!(
                        "ordinal map must be strictly monotone: {old} maps to {new}, not above {last}"
                    ),
                });
            }
        }
        previous = Some(new);
    }
    Ok(())
}
