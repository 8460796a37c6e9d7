use otoro_core::ProviderError;

/// Returns the shared row length, or the first mismatch as an error. An
/// empty matrix has dimension zero; the engine rejects that at builder
/// construction, not here.
pub(crate) fn validate_rows(lengths: impl Iterator<Item = usize>) -> Result<usize, ProviderError> {
    let mut expected = None;
    for length in lengths {
        match expected {
            None => expected = Some(length),
            Some(dimension) if dimension != length => {
                return Err(ProviderError::DimensionMismatch {
                    expected: dimension,
                    found: length,
                });
            }
            Some(_) => {}
        }
    }
    Ok(expected.unwrap_or(0))
}
