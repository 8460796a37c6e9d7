//! Error types shared across the otoro core crate.

use thiserror::Error;

/// Errors surfaced by [`crate::VectorProvider`] implementations.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum ProviderError {
    /// An ordinal outside `0..size()` was requested.
    #[error("vector ordinal {ordinal} is out of bounds")]
    OutOfBounds {
        /// The offending ordinal.
        ordinal: usize,
    },
    /// A vector did not match the provider's declared dimensionality.
    #[error("vector dimensionality mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Dimensionality declared by the provider.
        expected: usize,
        /// Dimensionality actually observed.
        found: usize,
    },
    /// The underlying storage raised an I/O fault while reading a vector.
    #[error("vector source I/O failure: {detail}")]
    Io {
        /// Human-readable description of the fault.
        detail: String,
    },
}

impl ProviderError {
    /// Returns a stable, machine-readable code for the variant.
    #[must_use]
    pub const fn code(&self) -> ProviderErrorCode {
        match self {
            Self::OutOfBounds { .. } => ProviderErrorCode::OutOfBounds,
            Self::DimensionMismatch { .. } => ProviderErrorCode::DimensionMismatch,
            Self::Io { .. } => ProviderErrorCode::Io,
        }
    }
}

/// Machine-readable codes for [`ProviderError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ProviderErrorCode {
    /// An ordinal outside `0..size()` was requested.
    OutOfBounds,
    /// A vector did not match the provider's declared dimensionality.
    DimensionMismatch,
    /// The underlying storage raised an I/O fault.
    Io,
}

impl ProviderErrorCode {
    /// Returns the symbolic identifier for logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OutOfBounds => "OUT_OF_BOUNDS",
            Self::DimensionMismatch => "DIMENSION_MISMATCH",
            Self::Io => "IO",
        }
    }
}
