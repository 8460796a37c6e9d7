use crate::provider::VectorRef;

use super::{Result, SimilarityError};

pub(crate) fn validate_pair(left: VectorRef<'_>, right: VectorRef<'_>) -> Result<()> {
    if left.is_empty() || right.is_empty() {
        return Err(SimilarityError::ZeroLength);
    }
    if left.len() != right.len() {
        return Err(SimilarityError::DimensionMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(())
}
