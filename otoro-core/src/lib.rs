//! Otoro core library.
//!
//! An in-memory approximate-nearest-neighbour engine: a concurrent HNSW
//! graph with multi-threaded insertion and lock-tolerant search. Vectors
//! live behind the [`VectorProvider`] trait; the engine stores only graph
//! structure and similarity scores.
//!
//! # Determinism
//!
//! Node levels are a pure function of the configured seed and the node's
//! ordinal, so level membership is identical across runs and thread counts.
//! Neighbour identities can differ at score ties under parallel insertion;
//! every published neighbour list still satisfies the diversity rule it was
//! built with.

mod error;
mod hnsw;
mod memory;
mod provider;
mod similarity;

pub use crate::{
    error::{ProviderError, ProviderErrorCode},
    hnsw::{
        AcceptFilter, CancellationToken, ConcurrentNeighbourSet, EntryPoint, FixedBitSet,
        GraphView, HnswBuilder, HnswError, HnswErrorCode, HnswGraph, HnswInvariant,
        HnswInvariantChecker, HnswInvariantViolation, HnswParams, Neighbour, NeighbourQueue,
        PairScorer, QueueOrder, SearchRequest, VectorCursors, search,
    },
    memory::format_bytes,
    provider::{VectorEncoding, VectorProvider, VectorRef},
    similarity::{Result as SimilarityResult, SimilarityError, SimilarityFunction},
};
