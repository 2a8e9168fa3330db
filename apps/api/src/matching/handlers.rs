//! Axum route handlers for the Recommendation API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::matching::explanation::explain;
use crate::matching::profile::{location_from_json, QueryProfile};
use crate::matching::scorer::ScoredPosting;
use crate::models::lenient::lenient_text;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Every field is optional. Text fields read `null` as empty and stringify
/// scalars. `lat`/`lon` accept numbers or numeric strings; anything else is
/// treated as an unknown location.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecommendRequest {
    #[serde(deserialize_with = "lenient_text")]
    pub education: String,
    #[serde(deserialize_with = "lenient_text")]
    pub skills: String,
    #[serde(deserialize_with = "lenient_text")]
    pub interests: String,
    #[serde(deserialize_with = "lenient_text")]
    pub resume_text: String,
    pub lat: Option<Value>,
    pub lon: Option<Value>,
}

impl From<&RecommendRequest> for QueryProfile {
    fn from(req: &RecommendRequest) -> Self {
        QueryProfile::new(
            &req.education,
            &req.skills,
            &req.interests,
            &req.resume_text,
            location_from_json(req.lat.as_ref(), req.lon.as_ref()),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub org: String,
    pub organization: String,
    pub location: String,
    pub city: String,
    pub state: String,
    pub sector: String,
    pub distance_km: Option<i64>,
    pub stipend: String,
    pub accommodation: i64,
    pub matched_skills: Vec<String>,
    pub explanation: String,
    pub score: f64,
    pub link: String,
}

impl Recommendation {
    fn new(scored: &ScoredPosting<'_>, explanation: String) -> Self {
        let posting = scored.posting;
        Self {
            id: posting.id.clone(),
            title: posting.title.clone(),
            org: posting.organization.clone(),
            organization: posting.organization.clone(),
            location: posting.display_location(),
            city: posting.city.clone(),
            state: posting.state.clone(),
            sector: posting.sector.to_lowercase(),
            distance_km: scored.distance_km.map(|km| km.round() as i64),
            stipend: posting.stipend.clone(),
            accommodation: posting.accommodation_estimate,
            matched_skills: scored.matched_skills.clone(),
            explanation,
            score: scored.score,
            link: posting.link.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub success: bool,
    pub recommendations: Vec<Recommendation>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/recommend
///
/// Ranks the catalog against the profile and returns the top matches with
/// explanations. Malformed fields are normalized, never rejected; only a body
/// that is not JSON gets the error envelope.
pub async fn handle_recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, AppError> {
    let Json(request) = payload?;
    let profile = QueryProfile::from(&request);
    let ranked = state.scorer.top_matches(&state.catalog, &profile);

    let mut recommendations = Vec::with_capacity(ranked.len());
    for scored in &ranked {
        let explanation = explain(&state.generation, scored, &profile).await;
        recommendations.push(Recommendation::new(scored, explanation));
    }

    info!(
        skills = profile.skills.len(),
        has_location = profile.location.is_some(),
        returned = recommendations.len(),
        top_id = recommendations.first().map(|r| r.id.as_str()).unwrap_or("-"),
        "Recommendations computed"
    );

    Ok(Json(RecommendResponse {
        success: true,
        recommendations,
    }))
}
