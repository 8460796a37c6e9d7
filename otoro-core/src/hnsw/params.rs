//! Parameter handling for the concurrent HNSW builder.

use super::error::HnswError;

/// SplitMix64 increment (the 64-bit golden ratio) used to derive per-node
/// level draws from the configured seed.
const ORDINAL_SEED_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

#[inline]
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(ORDINAL_SEED_SPACING);
    state = (state ^ (state >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    state = (state ^ (state >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    state ^ (state >> 31)
}

/// Configuration parameters for the concurrent HNSW index.
#[derive(Clone, Debug)]
pub struct HnswParams {
    max_connections: usize,
    beam_width: usize,
    max_level: usize,
    rng_seed: u64,
}

impl HnswParams {
    /// Creates a parameter set with the given neighbour fan-out (`M`) and
    /// construction beam width.
    ///
    /// # Errors
    /// Returns [`HnswError::InvalidParameters`] when either value is zero.
    ///
    /// # Examples
    /// ```
    /// use otoro_core::HnswParams;
    ///
    /// let params = HnswParams::new(16, 100)?;
    /// assert_eq!(params.max_connections(), 16);
    /// assert_eq!(params.beam_width(), 100);
    /// # Ok::<(), otoro_core::HnswError>(())
    /// ```
    pub fn new(max_connections: usize, beam_width: usize) -> Result<Self, HnswError> {
        if max_connections == 0 {
            return Err(HnswError::InvalidParameters {
                reason: "max_connections must be greater than zero".into(),
            });
        }
        if beam_width == 0 {
            return Err(HnswError::InvalidParameters {
                reason: "beam_width must be greater than zero".into(),
            });
        }
        Ok(Self {
            max_connections,
            beam_width,
            max_level: 12,
            rng_seed: 0x5EED_0707,
        })
    }

    /// Caps the maximum layer a node can be assigned.
    #[must_use]
    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    /// Seeds the level assignment to make construction reproducible.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Returns the neighbour fan-out enforced on levels above the base.
    #[must_use]
    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    /// Returns the candidate-list width used during insertion search.
    #[must_use]
    pub fn beam_width(&self) -> usize {
        self.beam_width
    }

    pub(crate) fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Draws the top level for `ordinal` from the geometric distribution
    /// `floor(-ln(U) / ln(M))`.
    ///
    /// The draw mixes the seed with the ordinal, so a node's level is a pure
    /// function of `(seed, ordinal)` and parallel insertion order cannot
    /// perturb level membership. With `M == 1` the multiplier degenerates,
    /// so every node stays on the base layer.
    pub(crate) fn assign_level(&self, ordinal: usize) -> usize {
        if self.max_connections == 1 {
            return 0;
        }
        let mixed = splitmix64(self.rng_seed ^ (ordinal as u64 + 1).wrapping_mul(ORDINAL_SEED_SPACING));
        // 53 mantissa bits give a uniform draw in [0, 1); clamp away from
        // zero before taking the logarithm.
        let unit = (mixed >> 11) as f64 / (1u64 << 53) as f64;
        let clamped = unit.clamp(1.0e-12, 1.0 - f64::EPSILON);
        let multiplier = (self.max_connections as f64).ln().recip();
        let level = (-clamped.ln() * multiplier) as usize;
        level.min(self.max_level)
    }
}
