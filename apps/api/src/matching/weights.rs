use serde::{Deserialize, Serialize};

/// Number of recommendations returned per request.
pub const TOP_K: usize = 5;

/// Interest sub-score awarded when a sector keyword appears in the student's interests.
pub const INTEREST_MATCH_SCORE: f64 = 0.5;

/// Blend weights for the four sub-scores. Fixed for the lifetime of the process.
///
/// Skills dominate because they are the only signal the posting states
/// explicitly. Description similarity comes next, then proximity, and the
/// sector/interest keyword match acts as a small tie-breaker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skill: f64,
    pub similarity: f64,
    pub distance: f64,
    pub interest: f64,
}

impl ScoringWeights {
    pub const DEFAULT: ScoringWeights = ScoringWeights {
        skill: 0.5,
        similarity: 0.3,
        distance: 0.15,
        interest: 0.05,
    };

    pub fn combine(&self, skill: f64, similarity: f64, distance: f64, interest: f64) -> f64 {
        self.skill * skill
            + self.similarity * similarity
            + self.distance * distance
            + self.interest * interest
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}
