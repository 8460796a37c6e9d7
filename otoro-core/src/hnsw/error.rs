//! Error types produced by the concurrent HNSW engine.

use thiserror::Error;

use crate::error::ProviderError;
use crate::similarity::SimilarityError;

/// Errors produced by graph construction and search.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum HnswError {
    /// Parameters were invalid for the requested configuration.
    #[error("invalid HNSW parameter: {reason}")]
    InvalidParameters {
        /// Human-readable explanation of the parameter failure.
        reason: String,
    },
    /// The build was cancelled before every node was inserted.
    #[error("graph build cancelled")]
    Cancelled,
    /// A similarity computation rejected its inputs.
    #[error("similarity failure between {left} and {right}: {source}")]
    Similarity {
        /// Ordinal of the first vector involved.
        left: usize,
        /// Ordinal of the second vector involved.
        right: usize,
        /// The underlying similarity error.
        source: SimilarityError,
    },
    /// Attempted to operate on an inconsistent graph state.
    #[error("graph invariant violated: {message}")]
    GraphInvariantViolation {
        /// Description of the violated invariant to assist debugging.
        message: String,
    },
    /// Wrapped [`crate::VectorProvider`] error.
    #[error("vector provider failure: {0}")]
    Provider(#[from] ProviderError),
}

impl HnswError {
    /// Returns a stable, machine-readable code for the variant.
    #[must_use]
    pub const fn code(&self) -> HnswErrorCode {
        match self {
            Self::InvalidParameters { .. } => HnswErrorCode::InvalidParameters,
            Self::Cancelled => HnswErrorCode::Cancelled,
            Self::Similarity { .. } => HnswErrorCode::Similarity,
            Self::GraphInvariantViolation { .. } => HnswErrorCode::GraphInvariantViolation,
            Self::Provider(_) => HnswErrorCode::Provider,
        }
    }
}

/// Machine-readable codes for [`HnswError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum HnswErrorCode {
    /// Parameters were invalid for the requested configuration.
    InvalidParameters,
    /// The build was cancelled before every node was inserted.
    Cancelled,
    /// A similarity computation rejected its inputs.
    Similarity,
    /// Attempted to operate on an inconsistent graph state.
    GraphInvariantViolation,
    /// Wrapped vector-provider error.
    Provider,
}

impl HnswErrorCode {
    /// Returns the symbolic identifier for logging and metrics surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidParameters => "INVALID_PARAMETERS",
            Self::Cancelled => "CANCELLED",
            Self::Similarity => "SIMILARITY",
            Self::GraphInvariantViolation => "GRAPH_INVARIANT_VIOLATION",
            Self::Provider => "PROVIDER",
        }
    }
}
