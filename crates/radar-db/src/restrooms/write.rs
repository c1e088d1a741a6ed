//! Write operations for the `restrooms` table.

use sqlx::{PgConnection, PgPool};

use super::types::NewRestroom;
use crate::DbError;

/// Rows sent per `INSERT … UNNEST` statement during an import.
pub const INSERT_BATCH_SIZE: usize = 50;

/// Replace the whole table with `restrooms`.
///
/// Deletes every existing row and inserts the new set in batches of
/// [`INSERT_BATCH_SIZE`], all inside one transaction. If any batch fails the
/// previous contents are left untouched. Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails.
pub async fn replace_all_restrooms(pool: &PgPool, restrooms: &[NewRestroom]) -> Result<u64, DbError> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM restrooms")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    tracing::debug!(deleted, "cleared restrooms table");

    let mut inserted = 0u64;
    for (batch_no, batch) in restrooms.chunks(INSERT_BATCH_SIZE).enumerate() {
        inserted += insert_batch(&mut tx, batch).await?;
        tracing::debug!(batch = batch_no + 1, rows = batch.len(), "inserted restroom batch");
    }

    tx.commit().await?;
    Ok(inserted)
}

async fn insert_batch(conn: &mut PgConnection, batch: &[NewRestroom]) -> Result<u64, sqlx::Error> {
    let mut building_names: Vec<String> = Vec::with_capacity(batch.len());
    let mut floors: Vec<Option<String>> = Vec::with_capacity(batch.len());
    let mut addresses: Vec<Option<String>> = Vec::with_capacity(batch.len());
    let mut latitudes: Vec<Option<f64>> = Vec::with_capacity(batch.len());
    let mut longitudes: Vec<Option<f64>> = Vec::with_capacity(batch.len());
    let mut rooms: Vec<Option<String>> = Vec::with_capacity(batch.len());
    let mut types: Vec<Option<String>> = Vec::with_capacity(batch.len());
    let mut stalls: Vec<Option<i32>> = Vec::with_capacity(batch.len());
    let mut showers: Vec<bool> = Vec::with_capacity(batch.len());
    let mut staff_only: Vec<bool> = Vec::with_capacity(batch.len());
    let mut notes: Vec<Option<String>> = Vec::with_capacity(batch.len());
    let mut place_ids: Vec<Option<String>> = Vec::with_capacity(batch.len());
    let mut formatted: Vec<Option<String>> = Vec::with_capacity(batch.len());
    let mut g_latitudes: Vec<Option<f64>> = Vec::with_capacity(batch.len());
    let mut g_longitudes: Vec<Option<f64>> = Vec::with_capacity(batch.len());
    let mut maps_urls: Vec<Option<String>> = Vec::with_capacity(batch.len());
    let mut directions_urls: Vec<Option<String>> = Vec::with_capacity(batch.len());
    let mut methods: Vec<Option<String>> = Vec::with_capacity(batch.len());
    let mut in_bbox: Vec<bool> = Vec::with_capacity(batch.len());

    for r in batch {
        building_names.push(r.building_name.clone());
        floors.push(r.floor_or_area.clone());
        addresses.push(r.address.clone());
        latitudes.push(r.latitude);
        longitudes.push(r.longitude);
        rooms.push(r.rooms.clone());
        types.push(r.restroom_type.clone());
        stalls.push(r.multi_user_stalls);
        showers.push(r.has_shower);
        staff_only.push(r.staff_only_any);
        notes.push(r.notes.clone());
        place_ids.push(r.place_id.clone());
        formatted.push(r.formatted_address_google.clone());
        g_latitudes.push(r.latitude_google);
        g_longitudes.push(r.longitude_google);
        maps_urls.push(r.google_maps_url.clone());
        directions_urls.push(r.google_directions_url.clone());
        methods.push(r.geocode_method.clone());
        in_bbox.push(r.within_campus_bbox);
    }

    let result = sqlx::query(
        "INSERT INTO restrooms \
             (building_name, floor_or_area, address, latitude, longitude, rooms, \
              restroom_type, multi_user_stalls, has_shower, staff_only_any, notes, \
              place_id, formatted_address_google, latitude_google, longitude_google, \
              google_maps_url, google_directions_url, geocode_method, within_campus_bbox) \
         SELECT * FROM UNNEST(\
              $1::text[], $2::text[], $3::text[], $4::float8[], $5::float8[], $6::text[], \
              $7::text[], $8::int4[], $9::bool[], $10::bool[], $11::text[], \
              $12::text[], $13::text[], $14::float8[], $15::float8[], \
              $16::text[], $17::text[], $18::text[], $19::bool[])",
    )
    .bind(&building_names)
    .bind(&floors)
    .bind(&addresses)
    .bind(&latitudes)
    .bind(&longitudes)
    .bind(&rooms)
    .bind(&types)
    .bind(&stalls)
    .bind(&showers)
    .bind(&staff_only)
    .bind(&notes)
    .bind(&place_ids)
    .bind(&formatted)
    .bind(&g_latitudes)
    .bind(&g_longitudes)
    .bind(&maps_urls)
    .bind(&directions_urls)
    .bind(&methods)
    .bind(&in_bbox)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}
