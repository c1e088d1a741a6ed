//! Turn ranked candidates into building-level location groups.

use std::collections::HashMap;

use crate::geo::{directions_url, maps_search_url, walking_eta_minutes};
use crate::model::{LocationGroup, RestroomResult, ScoredCandidate};

/// Upper bound on location groups in a search response.
pub const MAX_GROUPS: usize = 10;

/// How candidates are collapsed into location groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingPolicy {
    /// Each candidate becomes its own group, even when two share a building
    /// and address. Used by the fast search path.
    PerCandidate,
    /// Candidates with the same building name and display address share one
    /// group. Used by the enriched search path.
    ByBuildingAndAddress,
}

/// Build location groups from distance-ordered candidates.
///
/// `summaries` is positionally aligned with `candidates`; a missing entry
/// leaves that restroom's summary empty. Groups keep the order in which their
/// first member appears, so they stay sorted by distance. At most
/// [`MAX_GROUPS`] groups are returned. Records without stored map links get
/// links built from their coordinates.
#[must_use]
pub fn assemble(
    candidates: &[ScoredCandidate],
    summaries: &[String],
    policy: GroupingPolicy,
) -> Vec<LocationGroup> {
    let mut groups: Vec<LocationGroup> = Vec::new();
    let mut index_by_key: HashMap<(String, String), usize> = HashMap::new();

    for (i, candidate) in candidates.iter().enumerate() {
        let summary = summaries.get(i).cloned().unwrap_or_default();
        let result = to_result(candidate, summary);

        let slot = match policy {
            GroupingPolicy::PerCandidate => None,
            GroupingPolicy::ByBuildingAndAddress => {
                let key = (result.building_name.clone(), result.address.clone());
                match index_by_key.get(&key) {
                    Some(&idx) => Some(idx),
                    None => {
                        index_by_key.insert(key, groups.len());
                        None
                    }
                }
            }
        };

        match slot {
            Some(idx) => groups[idx].restrooms.push(result),
            None => groups.push(new_group(result)),
        }
    }

    groups.truncate(MAX_GROUPS);
    groups
}

fn to_result(candidate: &ScoredCandidate, natural_summary: String) -> RestroomResult {
    let record = &candidate.record;
    let (lat, lon) = (candidate.latitude, candidate.longitude);
    let google_maps_url = non_empty(record.maps_url.as_deref())
        .unwrap_or_else(|| maps_search_url(lat, lon, None));
    let google_directions_url = non_empty(record.directions_url.as_deref())
        .unwrap_or_else(|| directions_url(lat, lon, None));

    RestroomResult {
        id: record.id.to_string(),
        building_name: record.building_name.clone(),
        floor_or_area: record.floor_or_area.clone(),
        address: record.display_address().to_string(),
        latitude: lat,
        longitude: lon,
        rooms: record.rooms.clone(),
        restroom_type: record.restroom_type.as_str().to_string(),
        multi_user_stalls: record.multi_user_stalls,
        has_shower: record.has_shower,
        staff_only_any: record.staff_only,
        notes: record.notes.clone(),
        google_maps_url,
        google_directions_url,
        distance_miles: round_to_hundredths(candidate.distance_miles),
        eta_minutes: walking_eta_minutes(candidate.distance_miles),
        natural_summary,
    }
}

fn new_group(first: RestroomResult) -> LocationGroup {
    LocationGroup {
        building_name: first.building_name.clone(),
        address: first.address.clone(),
        latitude: first.latitude,
        longitude: first.longitude,
        distance_miles: first.distance_miles,
        eta_minutes: first.eta_minutes,
        google_maps_url: first.google_maps_url.clone(),
        restrooms: vec![first],
    }
}

fn non_empty(url: Option<&str>) -> Option<String> {
    url.map(str::trim)
        .filter(|u| !u.is_empty())
        .map(ToOwned::to_owned)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
