//! Concurrent implementation of the Hierarchical Navigable Small World
//! (HNSW) graph.
//!
//! The engine is lock-free end to end: neighbour lists publish through
//! compare-and-swap snapshots, the entry point is a monotone CAS cell, and
//! rayon drives parallel insertion while searches read consistent views of
//! whatever state has been published.

mod bitset;
mod builder;
mod error;
mod graph;
mod invariants;
mod neighbours;
mod params;
mod queue;
mod search;
mod types;

pub use self::{
    bitset::{AcceptFilter, FixedBitSet},
    builder::{CancellationToken, HnswBuilder, VectorCursors},
    error::{HnswError, HnswErrorCode},
    graph::{GraphView, HnswGraph},
    invariants::{HnswInvariant, HnswInvariantChecker, HnswInvariantViolation},
    neighbours::{ConcurrentNeighbourSet, PairScorer},
    params::HnswParams,
    queue::{NeighbourQueue, QueueOrder},
    search::{SearchRequest, search},
    types::{EntryPoint, Neighbour},
};

#[cfg(test)]
mod tests;
