//! Similarity function catalog.
//!
//! Every function maps a vector pair into a similarity score where higher
//! means more similar, finite by construction for finite inputs. Scores are
//! what the engine stores, orders, and prunes on; distances never leave this
//! module.

mod cosine;
mod dot;
mod euclidean;
mod helpers;

use thiserror::Error;

use crate::provider::VectorRef;

use helpers::validate_pair;

/// Result alias for similarity computations.
pub type Result<T> = std::result::Result<T, SimilarityError>;

/// Errors produced while scoring a vector pair.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum SimilarityError {
    /// One of the inputs had no components.
    #[error("cannot score a zero-length vector")]
    ZeroLength,
    /// The two inputs disagreed on dimensionality.
    #[error("vector dimensionality mismatch: left {left}, right {right}")]
    DimensionMismatch {
        /// Components in the left vector.
        left: usize,
        /// Components in the right vector.
        right: usize,
    },
    /// The two inputs disagreed on component encoding.
    #[error("cannot score vectors with different encodings")]
    EncodingMismatch,
    /// The computation produced a non-finite score.
    #[error("similarity computation produced a non-finite score")]
    NonFinite,
}

/// Similarity measures supported by the engine.
///
/// # Examples
/// ```
/// use otoro_core::{SimilarityFunction, VectorRef};
///
/// let sim = SimilarityFunction::DotProduct;
/// let score = sim.compare(VectorRef::F32(&[1.0, 0.0]), VectorRef::F32(&[1.0, 0.0]))?;
/// assert!((score - 1.0).abs() < 1e-6);
/// # Ok::<(), otoro_core::SimilarityError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SimilarityFunction {
    /// Inner product, normalised into `[0, 1]` for unit vectors.
    DotProduct,
    /// Inverse squared Euclidean distance, in `(0, 1]`.
    Euclidean,
    /// Cosine of the angle, normalised into `[0, 1]`.
    Cosine,
}

impl SimilarityFunction {
    /// Scores a vector pair; higher means more similar.
    ///
    /// # Errors
    /// Returns [`SimilarityError::DimensionMismatch`] or
    /// [`SimilarityError::EncodingMismatch`] for incompatible inputs,
    /// [`SimilarityError::ZeroLength`] for empty inputs, and
    /// [`SimilarityError::NonFinite`] when the inputs do not yield a finite
    /// score.
    pub fn compare(&self, left: VectorRef<'_>, right: VectorRef<'_>) -> Result<f32> {
        validate_pair(left, right)?;
        let score = match (self, left, right) {
            (Self::DotProduct, VectorRef::F32(a), VectorRef::F32(b)) => dot::score_f32(a, b),
            (Self::DotProduct, VectorRef::I8(a), VectorRef::I8(b)) => dot::score_i8(a, b),
            (Self::Euclidean, VectorRef::F32(a), VectorRef::F32(b)) => euclidean::score_f32(a, b),
            (Self::Euclidean, VectorRef::I8(a), VectorRef::I8(b)) => euclidean::score_i8(a, b),
            (Self::Cosine, VectorRef::F32(a), VectorRef::F32(b)) => cosine::score_f32(a, b),
            (Self::Cosine, VectorRef::I8(a), VectorRef::I8(b)) => cosine::score_i8(a, b),
            _ => return Err(SimilarityError::EncodingMismatch),
        };
        if score.is_finite() {
            Ok(score)
        } else {
            Err(SimilarityError::NonFinite)
        }
    }
}
