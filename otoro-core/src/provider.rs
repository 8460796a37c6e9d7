//! Vector source abstractions for the otoro core runtime.

use crate::error::ProviderError;

/// Storage encoding of the vectors a provider serves.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum VectorEncoding {
    /// Signed 8-bit components.
    Byte,
    /// IEEE-754 single-precision components.
    Float32,
}

/// Borrowed view of a single vector, discriminated by encoding.
///
/// Modelling the two component types as one sum type keeps similarity
/// dispatch a single `match` instead of a trait hierarchy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VectorRef<'a> {
    /// Single-precision components.
    F32(&'a [f32]),
    /// Signed-byte components.
    I8(&'a [i8]),
}

impl VectorRef<'_> {
    /// Returns the number of components in the vector.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::F32(values) => values.len(),
            Self::I8(values) => values.len(),
        }
    }

    /// Returns whether the vector has no components.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the encoding of the viewed vector.
    #[must_use]
    pub const fn encoding(&self) -> VectorEncoding {
        match self {
            Self::F32(_) => VectorEncoding::Float32,
            Self::I8(_) => VectorEncoding::Byte,
        }
    }
}

/// Random-access source of fixed-dimensional vectors.
///
/// A provider behaves like a cursor: callers that need concurrent access
/// obtain an independent cursor per thread via [`VectorProvider::copy`],
/// and each cursor then guarantees stateless random access.
///
/// # Examples
/// ```
/// use otoro_core::{ProviderError, VectorEncoding, VectorProvider, VectorRef};
///
/// #[derive(Clone)]
/// struct Flat(Vec<f32>);
///
/// impl VectorProvider for Flat {
///     fn size(&self) -> usize { self.0.len() }
///     fn dimension(&self) -> usize { 1 }
///     fn encoding(&self) -> VectorEncoding { VectorEncoding::Float32 }
///     fn vector(&self, ordinal: usize) -> Result<VectorRef<'_>, ProviderError> {
///         self.0
///             .get(ordinal..=ordinal)
///             .map(VectorRef::F32)
///             .ok_or(ProviderError::OutOfBounds { ordinal })
///     }
///     fn copy(&self) -> Result<Self, ProviderError> { Ok(self.clone()) }
/// }
///
/// let source = Flat(vec![0.5, 1.5]);
/// assert_eq!(source.size(), 2);
/// assert_eq!(source.vector(1)?, VectorRef::F32(&[1.5]));
/// # Ok::<(), ProviderError>(())
/// ```
pub trait VectorProvider: Send {
    /// Returns the number of vectors in the source.
    fn size(&self) -> usize;

    /// Returns whether the source contains no vectors.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns the dimensionality every vector in the source shares.
    fn dimension(&self) -> usize;

    /// Returns the component encoding of the source.
    fn encoding(&self) -> VectorEncoding;

    /// Returns the vector stored at `ordinal`.
    ///
    /// # Errors
    /// Returns [`ProviderError::OutOfBounds`] for ordinals at or past
    /// [`VectorProvider::size`], and [`ProviderError::Io`] when the backing
    /// storage fails.
    fn vector(&self, ordinal: usize) -> Result<VectorRef<'_>, ProviderError>;

    /// Returns an independent cursor over the same vectors, suitable for
    /// handing to another thread.
    ///
    /// # Errors
    /// Returns [`ProviderError::Io`] when the backing storage cannot be
    /// reopened.
    fn copy(&self) -> Result<Self, ProviderError>
    where
        Self: Sized;
}
