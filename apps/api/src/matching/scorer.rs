//! Candidate Scorer. Blends four normalized signals per posting and ranks the catalog.
//!
//! Algorithm, per posting:
//! 1. skill      = |query ∩ required| / |required|, 0 when nothing is required
//! 2. similarity = TF-IDF cosine of the profile text against the description
//! 3. distance   = max(0, 1 - km / 2000), unknown locations count as 9999 km
//! 4. interest   = 0.5 when a sector keyword appears in the interests text
//!
//! final = weighted sum (see `ScoringWeights`), ranked descending with a stable
//! sort so equal scores keep catalog order.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::CatalogIndex;
use crate::matching::geo::{distance_between, distance_score, UNKNOWN_DISTANCE_KM};
use crate::matching::profile::QueryProfile;
use crate::matching::weights::{ScoringWeights, INTEREST_MATCH_SCORE, TOP_K};
use crate::models::Posting;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubScores {
    pub skill: f64,
    pub similarity: f64,
    pub distance: f64,
    pub interest: f64,
}

#[derive(Debug, Clone)]
pub struct ScoredPosting<'a> {
    pub posting: &'a Posting,
    pub sub_scores: SubScores,
    pub score: f64,
    /// Sorted intersection of profile and posting skills.
    pub matched_skills: Vec<String>,
    /// `None` when either location was unknown.
    pub distance_km: Option<f64>,
    pub interest_match: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct CandidateScorer {
    weights: ScoringWeights,
    top_k: usize,
}

impl Default for CandidateScorer {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::DEFAULT,
            top_k: TOP_K,
        }
    }
}

impl CandidateScorer {
    /// Scores every posting and returns them ranked best-first.
    pub fn rank_all<'a>(
        &self,
        index: &'a CatalogIndex,
        profile: &QueryProfile,
    ) -> Vec<ScoredPosting<'a>> {
        let similarities = index.similarity(&profile.similarity_text());

        let mut scored: Vec<ScoredPosting<'a>> = index
            .postings()
            .iter()
            .zip(similarities)
            .map(|(posting, similarity)| self.score_posting(posting, profile, similarity))
            .collect();

        // Vec::sort_by is stable: ties keep catalog order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }

    /// The best `top_k` postings (never more than the catalog holds).
    pub fn top_matches<'a>(
        &self,
        index: &'a CatalogIndex,
        profile: &QueryProfile,
    ) -> Vec<ScoredPosting<'a>> {
        let mut ranked = self.rank_all(index, profile);
        ranked.truncate(self.top_k);
        ranked
    }

    pub fn score_posting<'a>(
        &self,
        posting: &'a Posting,
        profile: &QueryProfile,
        similarity: f64,
    ) -> ScoredPosting<'a> {
        let (skill, matched_skills) = skill_overlap(&profile.skills, &posting.required_skills);

        let distance_km = distance_between(profile.location, posting.location);
        let distance = distance_score(distance_km.unwrap_or(UNKNOWN_DISTANCE_KM));

        let interest_match = interest_matches(&profile.interests, &posting.sector);
        let interest = if interest_match {
            INTEREST_MATCH_SCORE
        } else {
            0.0
        };

        let similarity = similarity.clamp(0.0, 1.0);
        let score = self.weights.combine(skill, similarity, distance, interest);

        ScoredPosting {
            posting,
            sub_scores: SubScores {
                skill,
                similarity,
                distance,
                interest,
            },
            score,
            matched_skills,
            distance_km,
            interest_match,
        }
    }
}

/// Fraction of required skills the profile covers, plus the sorted matches.
pub fn skill_overlap(
    profile_skills: &BTreeSet<String>,
    required: &BTreeSet<String>,
) -> (f64, Vec<String>) {
    if required.is_empty() {
        return (0.0, Vec::new());
    }
    let matched: Vec<String> = required.intersection(profile_skills).cloned().collect();
    (matched.len() as f64 / required.len() as f64, matched)
}

/// True when any whitespace-delimited sector token occurs inside the interests text.
pub fn interest_matches(interests: &str, sector: &str) -> bool {
    if interests.trim().is_empty() || sector.trim().is_empty() {
        return false;
    }
    let interests = interests.to_lowercase();
    sector
        .to_lowercase()
        .split_whitespace()
        .any(|token| interests.contains(token))
}
