//! Read operations for the `restrooms` table.

use sqlx::PgPool;

use super::types::RestroomRow;

/// All restrooms flagged as inside the campus bounding box, in insertion order.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_eligible_restrooms(pool: &PgPool) -> Result<Vec<RestroomRow>, sqlx::Error> {
    sqlx::query_as::<_, RestroomRow>(
        "SELECT id, building_name, floor_or_area, address, latitude, longitude, \
                rooms, restroom_type, multi_user_stalls, has_shower, staff_only_any, \
                notes, formatted_address_google, latitude_google, longitude_google, \
                google_maps_url, google_directions_url, within_campus_bbox, created_at \
         FROM restrooms \
         WHERE within_campus_bbox = TRUE \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

/// Total number of rows, regardless of the campus flag.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn count_restrooms(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM restrooms")
        .fetch_one(pool)
        .await
}
