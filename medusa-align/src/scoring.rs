//! Scoring weights for the block aligner.

/// Match/mismatch/indel weights for the forward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoringWeights {
    /// Score for two equal tokens.
    pub match_score: i32,
    /// Score for two different tokens.
    pub mismatch: i32,
    /// Score for an insertion or deletion.
    pub indel: i32,
}

impl ScoringWeights {
    /// Create a custom weight set.
    pub fn new(match_score: i32, mismatch: i32, indel: i32) -> Self {
        Self {
            match_score,
            mismatch,
            indel,
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        // The weights the comparison pipeline has always used.
        Self {
            match_score: 2,
            mismatch: -1,
            indel: -4,
        }
    }
}
