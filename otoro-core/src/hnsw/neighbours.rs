//! Per-node, per-level neighbour lists with lock-free atomic publication.
//!
//! Members live in an immutable, score-sorted [`NeighbourArray`] behind an
//! `ArcSwap`. Writers compose a replacement array and publish it with a
//! compare-and-swap, recomputing from the freshly observed members whenever
//! the swap loses a race; readers load a complete snapshot and never observe
//! a partially applied update.

use std::collections::HashSet;
use std::sync::Arc;

use arc_swap::ArcSwap;

use super::error::HnswError;
use super::types::Neighbour;

/// Immutable member list, ordered by descending score with ties towards the
/// smaller id.
#[derive(Clone, Debug, Default)]
pub(crate) struct NeighbourArray {
    pub(crate) entries: Vec<Neighbour>,
}

/// Scores two stored nodes against each other. The diversity rule needs
/// neighbour-to-neighbour similarities that candidate lists do not carry.
pub trait PairScorer {
    /// Returns the similarity between the vectors at `left` and `right`.
    ///
    /// # Errors
    /// Propagates provider and similarity failures.
    fn between(&self, left: usize, right: usize) -> Result<f32, HnswError>;
}

impl<F> PairScorer for F
where
    F: Fn(usize, usize) -> Result<f32, HnswError>,
{
    fn between(&self, left: usize, right: usize) -> Result<f32, HnswError> {
        self(left, right)
    }
}

/// Capacity-bounded neighbour set for one node at one graph level.
///
/// The handle is cheap to clone; clones share the same published members.
/// Mutation never blocks readers, and concurrent writers resolve entirely
/// through compare-and-swap retries.
#[derive(Clone, Debug)]
pub struct ConcurrentNeighbourSet {
    inner: Arc<SetInner>,
}

#[derive(Debug)]
struct SetInner {
    node: usize,
    capacity: usize,
    members: ArcSwap<NeighbourArray>,
}

impl ConcurrentNeighbourSet {
    /// Creates an empty set for `node` holding at most `capacity` members.
    #[must_use]
    pub(crate) fn new(node: usize, capacity: usize) -> Self {
        Self {
            inner: Arc::new(SetInner {
                node,
                capacity,
                members: ArcSwap::from_pointee(NeighbourArray::default()),
            }),
        }
    }

    /// Returns the node this set belongs to.
    #[must_use]
    pub fn node(&self) -> usize {
        self.inner.node
    }

    /// Returns the maximum member count.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Returns the current member count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.members.load().entries.len()
    }

    /// Returns whether the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.members.load().entries.is_empty()
    }

    /// Returns whether `id` is currently a member.
    #[must_use]
    pub fn contains(&self, id: usize) -> bool {
        self.inner
            .members
            .load()
            .entries
            .iter()
            .any(|member| member.id == id)
    }

    /// Returns a point-in-time copy of the members, best first.
    ///
    /// The copy is taken from one published snapshot and stays coherent
    /// under concurrent mutation.
    #[must_use]
    pub fn neighbours(&self) -> Vec<Neighbour> {
        self.inner.members.load().entries.clone()
    }

    /// Returns the member ids, best first.
    #[must_use]
    pub fn nodes(&self) -> Vec<usize> {
        self.inner
            .members
            .load()
            .entries
            .iter()
            .map(|member| member.id)
            .collect()
    }

    pub(crate) fn snapshot(&self) -> Arc<NeighbourArray> {
        self.inner.members.load_full()
    }

    /// Installs `entries` verbatim, replacing any current members. Used when
    /// seeding a graph from an initializer; `entries` must already be sorted
    /// best first.
    pub(crate) fn seed(&self, entries: Vec<Neighbour>) {
        self.inner.members.store(Arc::new(NeighbourArray { entries }));
    }

    /// Rebuilds the member list from the current members plus `candidates`,
    /// keeping only mutually diverse entries.
    ///
    /// Candidates carry their similarity to this set's node. The walk runs
    /// in descending score order and accepts a candidate only while no
    /// already-accepted member is closer to it than this node is; it stops
    /// once `capacity` members are accepted. The result is published with a
    /// compare-and-swap and the walk restarts from the freshly observed
    /// members when the publish loses a race, so a stale merge is never
    /// installed. Two writers that both observed the same pre-state can
    /// still co-admit a pair either one would have rejected alone; the next
    /// update that observes both re-applies the rule.
    ///
    /// Returns the published members, best first, for reciprocal linking.
    ///
    /// # Errors
    /// Propagates scoring failures without publishing.
    pub fn insert_diverse<S: PairScorer>(
        &self,
        candidates: &[Neighbour],
        scorer: &S,
    ) -> Result<Vec<Neighbour>, HnswError> {
        let mut current = self.inner.members.load_full();
        loop {
            let merged = self.merge(&current.entries, candidates);
            let selected = self.select_diverse(&merged, scorer)?;
            self.debug_validate(&selected);
            let next = Arc::new(NeighbourArray {
                entries: selected.clone(),
            });
            let previous = self.inner.members.compare_and_swap(&current, next);
            if Arc::as_ptr(&*previous) == Arc::as_ptr(&current) {
                return Ok(selected);
            }
            tracing::trace!(node = self.inner.node, "neighbour publish contended; retrying");
            current = Arc::clone(&*previous);
        }
    }

    /// Adds the backlink `(id, score)` created when `id` chose this set's
    /// node as a neighbour.
    ///
    /// A set below capacity accepts the entry as-is; an overflowing set
    /// re-runs the diversity walk over the union, which displaces a member
    /// that the newcomer makes non-diverse or, when every member stays
    /// mutually diverse, drops the farthest by score. Backlinks may land
    /// before the forward insertion of `id` completes, so links can be
    /// transiently one-way; the walk tolerates that by construction.
    ///
    /// Returns whether the member list changed.
    ///
    /// # Errors
    /// Propagates scoring failures without publishing.
    pub fn insert_reciprocal<S: PairScorer>(
        &self,
        id: usize,
        score: f32,
        scorer: &S,
    ) -> Result<bool, HnswError> {
        if id == self.inner.node {
            return Ok(false);
        }
        let mut current = self.inner.members.load_full();
        loop {
            if current.entries.iter().any(|member| member.id == id) {
                return Ok(false);
            }
            let mut union = current.entries.clone();
            let position = union
                .partition_point(|member| {
                    Neighbour::descending(member, &Neighbour { id, score })
                        == std::cmp::Ordering::Less
                });
            union.insert(position, Neighbour { id, score });
            let entries = if union.len() > self.inner.capacity {
                self.select_diverse(&union, scorer)?
            } else {
                union
            };
            self.debug_validate(&entries);
            let next = Arc::new(NeighbourArray { entries });
            let previous = self.inner.members.compare_and_swap(&current, next);
            if Arc::as_ptr(&*previous) == Arc::as_ptr(&current) {
                return Ok(true);
            }
            tracing::trace!(node = self.inner.node, "backlink publish contended; retrying");
            current = Arc::clone(&*previous);
        }
    }

    /// Merges members and candidates into one descending-score list with no
    /// duplicates and no self-reference.
    fn merge(&self, members: &[Neighbour], candidates: &[Neighbour]) -> Vec<Neighbour> {
        let mut merged: Vec<Neighbour> = members
            .iter()
            .chain(candidates.iter())
            .filter(|entry| entry.id != self.inner.node)
            .copied()
            .collect();
        merged.sort_unstable_by(Neighbour::descending);
        let mut seen = HashSet::with_capacity(merged.len());
        merged.retain(|entry| seen.insert(entry.id));
        merged
    }

    /// Walks `ordered` (descending score) and keeps entries satisfying the
    /// relative-neighbourhood rule against everything kept so far, up to
    /// capacity.
    fn select_diverse<S: PairScorer>(
        &self,
        ordered: &[Neighbour],
        scorer: &S,
    ) -> Result<Vec<Neighbour>, HnswError> {
        let mut kept: Vec<Neighbour> = Vec::with_capacity(self.inner.capacity);
        for candidate in ordered {
            if kept.len() == self.inner.capacity {
                break;
            }
            if self.is_diverse(candidate, &kept, scorer)? {
                kept.push(*candidate);
            }
        }
        Ok(kept)
    }

    /// Debug-build check that a list about to be published is well formed:
    /// sorted best first, within capacity, no self-loop, no duplicates.
    fn debug_validate(&self, entries: &[Neighbour]) {
        debug_assert!(entries.len() <= self.inner.capacity);
        debug_assert!(entries.iter().all(|entry| entry.id != self.inner.node));
        debug_assert!(
            entries
                .windows(2)
                .all(|pair| Neighbour::descending(&pair[0], &pair[1]) != std::cmp::Ordering::Greater),
            "published neighbours must be sorted best first"
        );
        debug_assert!(
            {
                let mut ids: Vec<usize> = entries.iter().map(|entry| entry.id).collect();
                ids.sort_unstable();
                ids.windows(2).all(|pair| pair[0] != pair[1])
            },
            "published neighbours must be duplicate-free"
        );
    }

    /// A candidate stays diverse while every kept member is farther from it
    /// than this set's node is.
    fn is_diverse<S: PairScorer>(
        &self,
        candidate: &Neighbour,
        kept: &[Neighbour],
        scorer: &S,
    ) -> Result<bool, HnswError> {
        for member in kept {
            if scorer.between(candidate.id, member.id)? >= candidate.score {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
