use std::collections::BTreeSet;

use serde_json::Value;

use crate::models::{parse_skill_list, GeoPoint};

/// One student's query, normalized from request input.
#[derive(Debug, Clone, Default)]
pub struct QueryProfile {
    pub education: String,
    pub skills: BTreeSet<String>,
    pub interests: String,
    pub resume_text: String,
    pub location: Option<GeoPoint>,
}

impl QueryProfile {
    pub fn new(
        education: &str,
        skills: &str,
        interests: &str,
        resume_text: &str,
        location: Option<GeoPoint>,
    ) -> Self {
        Self {
            education: education.trim().to_string(),
            skills: parse_skill_list(skills),
            interests: interests.trim().to_string(),
            resume_text: resume_text.trim().to_string(),
            location,
        }
    }

    /// Education, interests and resume text joined by single spaces, skipping blanks.
    pub fn similarity_text(&self) -> String {
        [&self.education, &self.interests, &self.resume_text]
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Reads a coordinate from loosely-typed JSON. Numbers and numeric strings are
/// accepted; anything else (null, garbage, NaN) is treated as absent.
pub fn coordinate_from_json(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Location from a lat/lon pair; both must be present and valid.
pub fn location_from_json(lat: Option<&Value>, lon: Option<&Value>) -> Option<GeoPoint> {
    GeoPoint::from_parts(coordinate_from_json(lat), coordinate_from_json(lon))
}
