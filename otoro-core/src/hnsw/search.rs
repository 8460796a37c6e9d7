//! Beam search over the concurrent graph.
//!
//! Search descends greedily from the entry level with a single-candidate
//! frontier, then runs a best-first beam at the base layer. The visit budget
//! counts scored nodes across every level; the acceptance filter restricts
//! what is returned, never what is traversed.

use super::bitset::{AcceptFilter, FixedBitSet};
use super::error::HnswError;
use super::graph::HnswGraph;
use super::queue::NeighbourQueue;
use crate::provider::{VectorProvider, VectorRef};
use crate::similarity::SimilarityFunction;

/// One search invocation against a graph.
pub struct SearchRequest<'a, P: VectorProvider> {
    /// Query vector, in the provider's encoding.
    pub query: VectorRef<'a>,
    /// Number of results to return.
    pub top_k: usize,
    /// Vector source the graph was built over.
    pub vectors: &'a P,
    /// Similarity function the graph was built with.
    pub similarity: SimilarityFunction,
    /// Graph to search.
    pub graph: &'a HnswGraph,
    /// Optional per-node result filter.
    pub accept: Option<&'a dyn AcceptFilter>,
    /// Budget of scored nodes before the search gives up.
    pub visit_limit: usize,
}

/// Runs an approximate top-k search.
///
/// Returns a queue whose [`NeighbourQueue::nodes`] lists the results best
/// first; `visited_count` reports the nodes scored and `incomplete` whether
/// the visit budget expired first. An empty graph, or an acceptance filter
/// matching nothing reachable, yields an empty queue rather than an error.
///
/// # Errors
/// Propagates provider and similarity failures.
///
/// # Examples
/// ```
/// use otoro_core::{HnswGraph, SearchRequest, SimilarityFunction, VectorRef};
/// # use otoro_core::{HnswError, ProviderError, VectorEncoding, VectorProvider};
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
/// let vectors = Flat(vec![0.0]);
/// let graph = HnswGraph::new(4)?;
/// let results = otoro_core::search(SearchRequest {
///     query: VectorRef::F32(&[0.0]),
///     top_k: 3,
///     vectors: &vectors,
///     similarity: SimilarityFunction::Euclidean,
///     graph: &graph,
///     accept: None,
///     visit_limit: usize::MAX,
/// })?;
/// assert!(results.is_empty(), "empty graph yields an empty queue");
/// # Ok::<(), HnswError>(())
/// ```
pub fn search<P: VectorProvider>(request: SearchRequest<'_, P>) -> Result<NeighbourQueue, HnswError> {
    let SearchRequest {
        query,
        top_k,
        vectors,
        similarity,
        graph,
        accept,
        visit_limit,
    } = request;
    let Some(entry) = graph.entry() else {
        return Ok(NeighbourQueue::min_first(top_k));
    };

    let mut score = |ordinal: usize| -> Result<f32, HnswError> {
        let stored = vectors.vector(ordinal)?;
        similarity
            .compare(query, stored)
            .map_err(|source| HnswError::Similarity {
                left: ordinal,
                right: ordinal,
                source,
            })
    };

    let mut entry_points = vec![entry.node];
    let mut visited_total = 0usize;
    for level in (1..=entry.level).rev() {
        let descent = LevelSearch {
            level,
            width: 1,
            entry_points: &entry_points,
            accept: None,
            visit_limit: visit_limit.saturating_sub(visited_total),
        };
        let mut found = descent.run(graph, &mut score)?;
        visited_total += found.visited_count();
        if found.incomplete() {
            tracing::debug!(level, visited_total, "visit budget expired during descent");
            found.set_visited_count(visited_total);
            return Ok(found);
        }
        let best = found.nodes();
        if !best.is_empty() {
            entry_points = best;
        }
    }

    let base = LevelSearch {
        level: 0,
        width: top_k,
        entry_points: &entry_points,
        accept,
        visit_limit: visit_limit.saturating_sub(visited_total),
    };
    let mut results = base.run(graph, &mut score)?;
    visited_total += results.visited_count();
    results.set_visited_count(visited_total);
    Ok(results)
}

/// Best-first beam search restricted to one level.
pub(crate) struct LevelSearch<'a> {
    pub(crate) level: usize,
    pub(crate) width: usize,
    pub(crate) entry_points: &'a [usize],
    pub(crate) accept: Option<&'a dyn AcceptFilter>,
    pub(crate) visit_limit: usize,
}

impl LevelSearch<'_> {
    /// Expands the frontier best-first until the results stabilise or the
    /// visit budget expires, scoring each node at most once.
    pub(crate) fn run<F>(
        &self,
        graph: &HnswGraph,
        score: &mut F,
    ) -> Result<NeighbourQueue, HnswError>
    where
        F: FnMut(usize) -> Result<f32, HnswError>,
    {
        let mut results = NeighbourQueue::min_first(self.width);
        let mut candidates = NeighbourQueue::max_first(graph.size().max(self.width));
        let mut visited = FixedBitSet::with_capacity(graph.size());
        let mut visited_count = 0usize;
        let mut incomplete = false;
        // Only meaningful once the result queue is full.
        let mut floor = f32::NEG_INFINITY;

        for &entry in self.entry_points {
            if visited.get_and_set(entry) {
                continue;
            }
            if visited_count >= self.visit_limit {
                incomplete = true;
                break;
            }
            let entry_score = score(entry)?;
            visited_count += 1;
            candidates.push(entry, entry_score);
            if self.accepts(entry) {
                results.push(entry, entry_score);
            }
        }
        if results.is_full() {
            floor = results.top().map_or(floor, |worst| worst.score);
        }

        let mut view = graph.view();
        'expand: while !incomplete {
            let Some(best) = candidates.top() else {
                break;
            };
            if best.score < floor {
                break;
            }
            candidates.pop();
            if !view.seek(self.level, best.id) {
                continue;
            }
            while let Some(neighbour) = view.next_neighbour() {
                if visited.get_and_set(neighbour) {
                    continue;
                }
                if visited_count >= self.visit_limit {
                    incomplete = true;
                    break 'expand;
                }
                let neighbour_score = score(neighbour)?;
                visited_count += 1;
                if neighbour_score < floor {
                    continue;
                }
                candidates.push(neighbour, neighbour_score);
                if self.accepts(neighbour) && results.push(neighbour, neighbour_score) && results.is_full()
                {
                    floor = results.top().map_or(floor, |worst| worst.score);
                }
            }
        }

        results.set_visited_count(visited_count);
        if incomplete {
            results.mark_incomplete();
        }
        Ok(results)
    }

    fn accepts(&self, node: usize) -> bool {
        self.accept.is_none_or(|filter| filter.accept(node))
    }
}
