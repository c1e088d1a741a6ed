//! Restroom records, search queries, and the result shapes returned to callers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Search radius used when the caller does not provide one.
pub const DEFAULT_RADIUS_MILES: f64 = 1.2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RestroomType {
    SingleUser,
    MultiUser,
    /// Any label outside the two known kinds, kept verbatim.
    Other(String),
}

impl RestroomType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            RestroomType::SingleUser => "single-user",
            RestroomType::MultiUser => "multi-user",
            RestroomType::Other(raw) => raw,
        }
    }
}

impl Default for RestroomType {
    fn default() -> Self {
        RestroomType::Other("restroom".to_string())
    }
}

impl From<String> for RestroomType {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "single-user" => RestroomType::SingleUser,
            "multi-user" => RestroomType::MultiUser,
            "" => RestroomType::default(),
            other => RestroomType::Other(other.to_string()),
        }
    }
}

impl From<&str> for RestroomType {
    fn from(raw: &str) -> Self {
        RestroomType::from(raw.to_string())
    }
}

impl From<RestroomType> for String {
    fn from(kind: RestroomType) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for RestroomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One restroom as stored in the backing record store.
///
/// Coordinates come in two flavours: the values reported in the source
/// dataset and the values produced by the offline geocoder. Searches prefer
/// the geocoded pair (see [`RestroomRecord::coordinates`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestroomRecord {
    pub id: i64,
    pub building_name: String,
    pub floor_or_area: Option<String>,
    pub address: Option<String>,
    pub formatted_address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub geocoded_latitude: Option<f64>,
    pub geocoded_longitude: Option<f64>,
    pub rooms: Option<String>,
    pub restroom_type: RestroomType,
    pub multi_user_stalls: Option<u32>,
    pub has_shower: bool,
    pub staff_only: bool,
    pub notes: Option<String>,
    pub maps_url: Option<String>,
    pub directions_url: Option<String>,
    /// Coarse storage-side filter flag; not consulted by the ranking pipeline.
    pub within_campus_bbox: bool,
}

impl RestroomRecord {
    /// Coordinates usable for distance computation, geocoded pair first.
    ///
    /// Returns `None` when neither pair is complete and finite, which makes the
    /// record ineligible for a search.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        finite_pair(self.geocoded_latitude, self.geocoded_longitude)
            .or_else(|| finite_pair(self.latitude, self.longitude))
    }

    /// Geocoded formatted address, then the dataset address, then `""`.
    #[must_use]
    pub fn display_address(&self) -> &str {
        non_blank(self.formatted_address.as_deref())
            .or_else(|| non_blank(self.address.as_deref()))
            .unwrap_or("")
    }
}

fn finite_pair(lat: Option<f64>, lon: Option<f64>) -> Option<(f64, f64)> {
    match (lat, lon) {
        (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
        _ => None,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("latitude must be a finite value between -90 and 90, got {0}")]
    InvalidLatitude(f64),
    #[error("longitude must be a finite value between -180 and 180, got {0}")]
    InvalidLongitude(f64),
    #[error("radius_miles must be a positive number, got {0}")]
    InvalidRadius(f64),
}

/// A caller's position plus the radius to search within.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationQuery {
    latitude: f64,
    longitude: f64,
    radius_miles: f64,
}

impl LocationQuery {
    /// Builds a query, falling back to [`DEFAULT_RADIUS_MILES`].
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when a coordinate is out of range or the radius
    /// is not a positive finite number.
    pub fn new(
        latitude: f64,
        longitude: f64,
        radius_miles: Option<f64>,
    ) -> Result<Self, QueryError> {
        Self::with_default_radius(latitude, longitude, radius_miles, DEFAULT_RADIUS_MILES)
    }

    /// Same as [`LocationQuery::new`] with a caller-chosen default radius.
    ///
    /// # Errors
    ///
    /// See [`LocationQuery::new`].
    pub fn with_default_radius(
        latitude: f64,
        longitude: f64,
        radius_miles: Option<f64>,
        default_radius_miles: f64,
    ) -> Result<Self, QueryError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(QueryError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(QueryError::InvalidLongitude(longitude));
        }
        let radius_miles = radius_miles.unwrap_or(default_radius_miles);
        if !radius_miles.is_finite() || radius_miles <= 0.0 {
            return Err(QueryError::InvalidRadius(radius_miles));
        }
        Ok(Self {
            latitude,
            longitude,
            radius_miles,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    #[must_use]
    pub fn radius_miles(&self) -> f64 {
        self.radius_miles
    }
}

/// A record that passed the radius filter, with its distance from the query point.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub record: RestroomRecord,
    /// Great-circle distance in miles; never negative.
    pub distance_miles: f64,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestroomResult {
    pub id: String,
    pub building_name: String,
    pub floor_or_area: Option<String>,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub rooms: Option<String>,
    pub restroom_type: String,
    pub multi_user_stalls: Option<u32>,
    pub has_shower: bool,
    pub staff_only_any: bool,
    pub notes: Option<String>,
    pub google_maps_url: String,
    pub google_directions_url: String,
    /// Rounded to two decimals for display.
    pub distance_miles: f64,
    pub eta_minutes: u32,
    pub natural_summary: String,
}

/// Restrooms sharing one building, shown as a single map entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationGroup {
    pub building_name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_miles: f64,
    pub eta_minutes: u32,
    pub google_maps_url: String,
    pub restrooms: Vec<RestroomResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restroom_type_parses_known_labels() {
        assert_eq!(RestroomType::from("single-user"), RestroomType::SingleUser);
        assert_eq!(RestroomType::from("multi-user"), RestroomType::MultiUser);
        assert_eq!(
            RestroomType::from("family"),
            RestroomType::Other("family".to_string())
        );
        assert_eq!(RestroomType::from("  "), RestroomType::default());
    }

    #[test]
    fn restroom_type_serializes_as_plain_string() {
        let json = serde_json::to_string(&RestroomType::MultiUser).expect("serialize");
        assert_eq!(json, "\"multi-user\"");
        let back: RestroomType = serde_json::from_str("\"single-user\"").expect("deserialize");
        assert_eq!(back, RestroomType::SingleUser);
    }

    #[test]
    fn coordinates_prefer_geocoded_pair() {
        let record = RestroomRecord {
            latitude: Some(1.0),
            longitude: Some(2.0),
            geocoded_latitude: Some(42.39),
            geocoded_longitude: Some(-72.52),
            ..RestroomRecord::default()
        };
        assert_eq!(record.coordinates(), Some((42.39, -72.52)));
    }

    #[test]
    fn coordinates_fall_back_to_reported_pair() {
        let record = RestroomRecord {
            latitude: Some(42.38),
            longitude: Some(-72.53),
            geocoded_latitude: Some(42.39),
            geocoded_longitude: None,
            ..RestroomRecord::default()
        };
        assert_eq!(record.coordinates(), Some((42.38, -72.53)));
    }

    #[test]
    fn coordinates_missing_or_non_finite_are_none() {
        let record = RestroomRecord {
            latitude: Some(f64::NAN),
            longitude: Some(-72.53),
            ..RestroomRecord::default()
        };
        assert_eq!(record.coordinates(), None);
        assert_eq!(RestroomRecord::default().coordinates(), None);
    }

    #[test]
    fn display_address_prefers_formatted_address() {
        let mut record = RestroomRecord {
            address: Some("151 Presidents Dr".to_string()),
            formatted_address: Some("151 Presidents Dr, Amherst, MA 01003".to_string()),
            ..RestroomRecord::default()
        };
        assert_eq!(
            record.display_address(),
            "151 Presidents Dr, Amherst, MA 01003"
        );
        record.formatted_address = Some("   ".to_string());
        assert_eq!(record.display_address(), "151 Presidents Dr");
        record.address = None;
        assert_eq!(record.display_address(), "");
    }

    #[test]
    fn query_defaults_radius() {
        let query = LocationQuery::new(42.3899, -72.528, None).expect("query");
        assert!((query.radius_miles() - DEFAULT_RADIUS_MILES).abs() < f64::EPSILON);
    }

    #[test]
    fn query_rejects_bad_radius() {
        assert_eq!(
            LocationQuery::new(42.0, -72.0, Some(0.0)),
            Err(QueryError::InvalidRadius(0.0))
        );
        assert!(matches!(
            LocationQuery::new(42.0, -72.0, Some(-1.0)),
            Err(QueryError::InvalidRadius(_))
        ));
        assert!(matches!(
            LocationQuery::new(42.0, -72.0, Some(f64::INFINITY)),
            Err(QueryError::InvalidRadius(_))
        ));
    }

    #[test]
    fn query_rejects_out_of_range_coordinates() {
        assert!(matches!(
            LocationQuery::new(91.0, 0.0, None),
            Err(QueryError::InvalidLatitude(_))
        ));
        assert!(matches!(
            LocationQuery::new(0.0, -180.5, None),
            Err(QueryError::InvalidLongitude(_))
        ));
        assert!(matches!(
            LocationQuery::new(f64::NAN, 0.0, None),
            Err(QueryError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn query_uses_custom_default_radius() {
        let query =
            LocationQuery::with_default_radius(42.0, -72.0, None, 0.25).expect("query");
        assert!((query.radius_miles() - 0.25).abs() < f64::EPSILON);
    }
}
