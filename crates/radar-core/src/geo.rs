//! Great-circle distance, walking-time estimates, and campus geometry helpers.

/// Mean Earth radius in miles used by the haversine formula.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Fixed walking pace; no terrain or crowd adjustment.
pub const WALKING_SPEED_MPH: f64 = 3.0;

/// Haversine distance between two lat/lon points, in miles.
///
/// Symmetric in its arguments and `0.0` for identical points. Inputs outside
/// the usual coordinate ranges still produce a number.
#[must_use]
pub fn distance_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = ((delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Walking time in whole minutes at [`WALKING_SPEED_MPH`], truncated.
///
/// Never less than one minute, including for a zero distance.
#[must_use]
pub fn walking_eta_minutes(distance_miles: f64) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let minutes = (distance_miles / WALKING_SPEED_MPH * 60.0) as u32;
    minutes.max(1)
}

/// Axis-aligned latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Inclusive on every edge.
    #[must_use]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

/// The campus rectangle used to set `within_campus_bbox` on imported records.
pub const CAMPUS_BBOX: BoundingBox = BoundingBox {
    min_lat: 42.375,
    max_lat: 42.405,
    min_lon: -72.545,
    max_lon: -72.510,
};

/// Google Maps search link for a point, pinned to a place when one is known.
#[must_use]
pub fn maps_search_url(lat: f64, lon: f64, place_id: Option<&str>) -> String {
    let mut url = format!("https://www.google.com/maps/search/?api=1&query={lat},{lon}");
    if let Some(id) = place_id.filter(|id| !id.is_empty()) {
        url.push_str("&query_place_id=");
        url.push_str(id);
    }
    url
}

/// Google Maps walking directions to a point.
#[must_use]
pub fn directions_url(lat: f64, lon: f64, place_id: Option<&str>) -> String {
    let mut url = format!(
        "https://www.google.com/maps/dir/?api=1&destination={lat},{lon}&travelmode=walking"
    );
    if let Some(id) = place_id.filter(|id| !id.is_empty()) {
        url.push_str("&destination_place_id=");
        url.push_str(id);
    }
    url
}
