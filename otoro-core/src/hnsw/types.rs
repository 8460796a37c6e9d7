//! Value types shared across the HNSW engine.

use std::cmp::Ordering;

/// A scored graph node: the id of a neighbour candidate and its similarity
/// to some reference vector. Scores are finite; the validation layer rejects
/// non-finite similarities before they reach the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbour {
    /// Ordinal of the node within the vector provider.
    pub id: usize,
    /// Similarity to the reference vector; higher is more similar.
    pub score: f32,
}

impl Neighbour {
    /// Orders best first: descending score, ties towards the smaller id.
    #[must_use]
    pub(crate) fn descending(left: &Self, right: &Self) -> Ordering {
        right
            .score
            .partial_cmp(&left.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| left.id.cmp(&right.id))
    }
}

/// Entry point into the hierarchical graph used when searching.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EntryPoint {
    /// Node id the search starts from.
    pub node: usize,
    /// Highest level the node occupies.
    pub level: usize,
}
