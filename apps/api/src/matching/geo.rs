//! Great-circle distance and its normalization into a proximity sub-score.

use crate::models::GeoPoint;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Stand-in distance when either side has no usable location.
pub const UNKNOWN_DISTANCE_KM: f64 = 9999.0;

/// Distances at or beyond this score zero.
pub const DISTANCE_HORIZON_KM: f64 = 2000.0;

/// Haversine distance in kilometers.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lon - a.lon).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);
    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// `None` when either location is unknown.
pub fn distance_between(a: Option<GeoPoint>, b: Option<GeoPoint>) -> Option<f64> {
    Some(haversine_km(a?, b?))
}

/// `max(0, 1 - km / 2000)`; non-increasing in distance.
pub fn distance_score(distance_km: f64) -> f64 {
    (1.0 - distance_km / DISTANCE_HORIZON_KM).max(0.0)
}
