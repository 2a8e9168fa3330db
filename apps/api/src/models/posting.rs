use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Accommodation estimate used when the catalog cell is missing or not a number.
pub const DEFAULT_ACCOMMODATION_ESTIMATE: i64 = 2500;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Returns `None` unless both coordinates are finite and within range.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        valid.then_some(Self { lat, lon })
    }

    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        Self::new(lat?, lon?)
    }
}

/// One internship posting from the catalog. Immutable once loaded.
#[derive(Debug, Clone, Serialize)]
pub struct Posting {
    pub id: String,
    pub title: String,
    pub organization: String,
    pub city: String,
    pub state: String,
    pub location: Option<GeoPoint>,
    pub description: String,
    pub required_skills: BTreeSet<String>,
    pub sector: String,
    pub stipend: String,
    pub accommodation_estimate: i64,
    pub link: String,
}

impl Posting {
    /// "{city}, {state}" as shown to students.
    pub fn display_location(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }
}

/// A catalog row exactly as it appears in the CSV file.
///
/// Every cell is read as text so a malformed number degrades to a default
/// instead of failing the whole load.
#[derive(Debug, Clone, Deserialize)]
pub struct PostingRow {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lon: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_skills: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub stipend: String,
    #[serde(default)]
    pub accommodation_estimate: String,
    #[serde(default)]
    pub link: String,
}

impl From<PostingRow> for Posting {
    fn from(row: PostingRow) -> Self {
        let location = GeoPoint::from_parts(parse_number(&row.lat), parse_number(&row.lon));
        let accommodation_estimate = parse_number(&row.accommodation_estimate)
            .map(|v| v.round() as i64)
            .unwrap_or(DEFAULT_ACCOMMODATION_ESTIMATE);
        let stipend = match row.stipend.trim() {
            "" => "N/A".to_string(),
            s => s.to_string(),
        };

        Posting {
            id: row.id.trim().to_string(),
            title: row.title.trim().to_string(),
            organization: row.organization.trim().to_string(),
            city: row.city.trim().to_string(),
            state: row.state.trim().to_string(),
            location,
            description: row.description,
            required_skills: parse_skill_list(&row.required_skills),
            sector: row.sector.trim().to_string(),
            stipend,
            accommodation_estimate,
            link: row.link.trim().to_string(),
        }
    }
}

/// Splits a semicolon-delimited skill list into a set of trimmed, lowercase tokens.
/// Empty tokens are dropped, so `""` and `";;"` both yield an empty set.
pub fn parse_skill_list(raw: &str) -> BTreeSet<String> {
    raw.split(';')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
