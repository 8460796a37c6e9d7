//! Dense in-memory vector providers for the otoro engine.
//!
//! Both providers hold their matrix in one shared allocation, so
//! [`VectorProvider::copy`] is a reference-count bump and worker threads can
//! open cursors freely.

use std::sync::Arc;

use otoro_core::{ProviderError, VectorEncoding, VectorProvider, VectorRef};

mod validate;

use validate::validate_rows;

/// In-memory `f32` vector source.
///
/// # Examples
/// ```
/// use otoro_providers_dense::DenseF32Vectors;
/// use otoro_core::VectorProvider;
///
/// let vectors = DenseF32Vectors::try_new(vec![vec![0.0, 1.0], vec![1.0, 0.0]])?;
/// assert_eq!(vectors.size(), 2);
/// assert_eq!(vectors.dimension(), 2);
/// # Ok::<(), otoro_core::ProviderError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DenseF32Vectors {
    rows: Arc<Vec<Vec<f32>>>,
    dimension: usize,
}

impl DenseF32Vectors {
    /// Builds a provider over `rows`, validating that every row shares the
    /// first row's dimensionality.
    ///
    /// # Errors
    /// Returns [`ProviderError::DimensionMismatch`] on ragged input.
    pub fn try_new(rows: Vec<Vec<f32>>) -> Result<Self, ProviderError> {
        let dimension = validate_rows(rows.iter().map(Vec::len))?;
        Ok(Self {
            rows: Arc::new(rows),
            dimension,
        })
    }
}

impl VectorProvider for DenseF32Vectors {
    fn size(&self) -> usize {
        self.rows.len()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn encoding(&self) -> VectorEncoding {
        VectorEncoding::Float32
    }

    fn vector(&self, ordinal: usize) -> Result<VectorRef<'_>, ProviderError> {
        self.rows
            .get(ordinal)
            .map(|row| VectorRef::F32(row))
            .ok_or(ProviderError::OutOfBounds { ordinal })
    }

    fn copy(&self) -> Result<Self, ProviderError> {
        Ok(self.clone())
    }
}

/// In-memory signed-byte vector source for quantised corpora.
///
/// # Examples
/// ```
/// use otoro_providers_dense::DenseI8Vectors;
/// use otoro_core::{VectorProvider, VectorRef};
///
/// let vectors = DenseI8Vectors::try_new(vec![vec![1, -2], vec![3, 4]])?;
/// assert_eq!(vectors.vector(1)?, VectorRef::I8(&[3, 4]));
/// # Ok::<(), otoro_core::ProviderError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DenseI8Vectors {
    rows: Arc<Vec<Vec<i8>>>,
    dimension: usize,
}

impl DenseI8Vectors {
    /// Builds a provider over `rows`, validating that every row shares the
    /// first row's dimensionality.
    ///
    /// # Errors
    /// Returns [`ProviderError::DimensionMismatch`] on ragged input.
    pub fn try_new(rows: Vec<Vec<i8>>) -> Result<Self, ProviderError> {
        let dimension = validate_rows(rows.iter().map(Vec::len))?;
        Ok(Self {
            rows: Arc::new(rows),
            dimension,
        })
    }
}

impl VectorProvider for DenseI8Vectors {
    fn size(&self) -> usize {
        self.rows.len()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn encoding(&self) -> VectorEncoding {
        VectorEncoding::Byte
    }

    fn vector(&self, ordinal: usize) -> Result<VectorRef<'_>, ProviderError> {
        self.rows
            .get(ordinal)
            .map(|row| VectorRef::I8(row))
            .ok_or(ProviderError::OutOfBounds { ordinal })
    }

    fn copy(&self) -> Result<Self, ProviderError> {
        Ok(self.clone())
    }
}
