//! Row types for the `restrooms` table.

use chrono::{DateTime, Utc};
use radar_core::{RestroomRecord, RestroomType};

/// Input record for the dataset import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewRestroom {
    pub building_name: String,
    pub floor_or_area: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rooms: Option<String>,
    pub restroom_type: Option<String>,
    pub multi_user_stalls: Option<i32>,
    pub has_shower: bool,
    pub staff_only_any: bool,
    pub notes: Option<String>,
    pub place_id: Option<String>,
    pub formatted_address_google: Option<String>,
    pub latitude_google: Option<f64>,
    pub longitude_google: Option<f64>,
    pub google_maps_url: Option<String>,
    pub google_directions_url: Option<String>,
    pub geocode_method: Option<String>,
    pub within_campus_bbox: bool,
}

/// A row from the `restrooms` table.
///
/// Import-only columns (`place_id`, `geocode_method`) are not read back.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RestroomRow {
    pub id: i64,
    pub building_name: String,
    pub floor_or_area: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rooms: Option<String>,
    pub restroom_type: Option<String>,
    pub multi_user_stalls: Option<i32>,
    pub has_shower: bool,
    pub staff_only_any: bool,
    pub notes: Option<String>,
    pub formatted_address_google: Option<String>,
    pub latitude_google: Option<f64>,
    pub longitude_google: Option<f64>,
    pub google_maps_url: Option<String>,
    pub google_directions_url: Option<String>,
    pub within_campus_bbox: bool,
    pub created_at: DateTime<Utc>,
}

impl From<RestroomRow> for RestroomRecord {
    fn from(row: RestroomRow) -> Self {
        RestroomRecord {
            id: row.id,
            building_name: row.building_name,
            floor_or_area: row.floor_or_area,
            address: row.address,
            formatted_address: row.formatted_address_google,
            latitude: row.latitude,
            longitude: row.longitude,
            geocoded_latitude: row.latitude_google,
            geocoded_longitude: row.longitude_google,
            rooms: row.rooms,
            restroom_type: row
                .restroom_type
                .map(RestroomType::from)
                .unwrap_or_default(),
            // the column has a non-negative CHECK
            multi_user_stalls: row.multi_user_stalls.and_then(|n| u32::try_from(n).ok()),
            has_shower: row.has_shower,
            staff_only: row.staff_only_any,
            notes: row.notes,
            maps_url: row.google_maps_url,
            directions_url: row.google_directions_url,
            within_campus_bbox: row.within_campus_bbox,
        }
    }
}
