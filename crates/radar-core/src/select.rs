//! Radius filtering and distance ranking of raw restroom records.

use crate::geo::distance_miles;
use crate::model::{LocationQuery, RestroomRecord, ScoredCandidate};

/// Upper bound on candidates handed to the assembler.
pub const MAX_CANDIDATES: usize = 20;

/// Rank the records within `query`'s radius by ascending distance.
///
/// Records without usable coordinates are skipped. Equal distances keep the
/// order in which the store returned them. At most [`MAX_CANDIDATES`] entries
/// are returned.
#[must_use]
pub fn select_candidates(query: &LocationQuery, records: &[RestroomRecord]) -> Vec<ScoredCandidate> {
    let mut candidates: Vec<ScoredCandidate> = records
        .iter()
        .filter_map(|record| {
            let (lat, lon) = record.coordinates()?;
            let distance = distance_miles(query.latitude(), query.longitude(), lat, lon);
            (distance <= query.radius_miles()).then(|| ScoredCandidate {
                record: record.clone(),
                distance_miles: distance,
                latitude: lat,
                longitude: lon,
            })
        })
        .collect();

    // Vec::sort_by is stable, which gives the tie-break on store order.
    candidates.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    candidates.truncate(MAX_CANDIDATES);
    candidates
}
