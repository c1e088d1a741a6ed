//! Geocoded dataset import for `db seed`.
//!
//! Reads the enriched CSV produced by the offline geocoder and turns each row
//! into a [`NewRestroom`]. Blank cells become `None`; rows without a building
//! name are dropped.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};
use csv::{ReaderBuilder, Trim};
use radar_core::{directions_url, maps_search_url, CAMPUS_BBOX};
use radar_db::NewRestroom;
use serde::Deserialize;

/// One CSV row, every cell kept as text until validated.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SeedRow {
    building_name: String,
    floor_or_area: String,
    address: String,
    latitude: String,
    longitude: String,
    rooms: String,
    restroom_type: String,
    multi_user_stalls: String,
    has_shower: String,
    staff_only_any: String,
    notes: String,
    place_id: String,
    formatted_address_google: String,
    latitude_google: String,
    longitude_google: String,
    google_maps_url: String,
    google_directions_url: String,
    geocode_method: String,
    within_campus_bbox: String,
}

/// Parse the dataset at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a row holds a value that
/// does not parse (a non-numeric coordinate, an unknown boolean, a fractional
/// stall count).
pub(crate) fn load_seed_file(path: &Path) -> anyhow::Result<Vec<NewRestroom>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open seed file {}", path.display()))?;
    read_seed_rows(file)
}

/// Parse dataset rows from any reader with a header line.
///
/// # Errors
///
/// See [`load_seed_file`].
pub(crate) fn read_seed_rows<R: Read>(reader: R) -> anyhow::Result<Vec<NewRestroom>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut restrooms = Vec::new();
    for (index, row) in rdr.deserialize::<SeedRow>().enumerate() {
        // header is line 1
        let line = index + 2;
        let row = row.with_context(|| format!("malformed CSV at line {line}"))?;
        if let Some(restroom) =
            to_new_restroom(row).with_context(|| format!("invalid value at line {line}"))?
        {
            restrooms.push(restroom);
        } else {
            tracing::debug!(line, "skipping row without a building name");
        }
    }
    Ok(restrooms)
}

fn to_new_restroom(row: SeedRow) -> anyhow::Result<Option<NewRestroom>> {
    let Some(building_name) = non_blank(row.building_name) else {
        return Ok(None);
    };

    let latitude = parse_f64("latitude", &row.latitude)?;
    let longitude = parse_f64("longitude", &row.longitude)?;
    let latitude_google = parse_f64("latitude_google", &row.latitude_google)?;
    let longitude_google = parse_f64("longitude_google", &row.longitude_google)?;
    let place_id = non_blank(row.place_id);

    // geocoded pair first, then the reported one
    let point = match (latitude_google, longitude_google) {
        (Some(lat), Some(lon)) => Some((lat, lon)),
        _ => latitude.zip(longitude),
    };

    let within_campus_bbox = match parse_bool("within_campus_bbox", &row.within_campus_bbox)? {
        Some(flag) => flag,
        None => point.is_none_or(|(lat, lon)| CAMPUS_BBOX.contains(lat, lon)),
    };

    let google_maps_url = non_blank(row.google_maps_url).or_else(|| {
        point.map(|(lat, lon)| maps_search_url(lat, lon, place_id.as_deref()))
    });
    let google_directions_url = non_blank(row.google_directions_url).or_else(|| {
        point.map(|(lat, lon)| directions_url(lat, lon, place_id.as_deref()))
    });

    Ok(Some(NewRestroom {
        building_name,
        floor_or_area: non_blank(row.floor_or_area),
        address: non_blank(row.address),
        latitude,
        longitude,
        rooms: non_blank(row.rooms),
        restroom_type: non_blank(row.restroom_type),
        multi_user_stalls: parse_stalls(&row.multi_user_stalls)?,
        has_shower: parse_bool("has_shower", &row.has_shower)?.unwrap_or(false),
        staff_only_any: parse_bool("staff_only_any", &row.staff_only_any)?.unwrap_or(false),
        notes: non_blank(row.notes),
        place_id,
        formatted_address_google: non_blank(row.formatted_address_google),
        latitude_google,
        longitude_google,
        google_maps_url,
        google_directions_url,
        geocode_method: non_blank(row.geocode_method),
        within_campus_bbox,
    }))
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_f64(column: &str, value: &str) -> anyhow::Result<Option<f64>> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let parsed: f64 = value
        .parse()
        .with_context(|| format!("{column}: '{value}' is not a number"))?;
    Ok(Some(parsed))
}

fn parse_bool(column: &str, value: &str) -> anyhow::Result<Option<bool>> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "true" | "1" | "yes" => Ok(Some(true)),
        "false" | "0" | "no" => Ok(Some(false)),
        other => bail!("{column}: '{other}' is not a boolean"),
    }
}

/// Whole, non-negative stall counts; spreadsheets export `4` as `4.0`.
fn parse_stalls(value: &str) -> anyhow::Result<Option<i32>> {
    let Some(count) = parse_f64("multi_user_stalls", value)? else {
        return Ok(None);
    };
    if count < 0.0 || count.fract() != 0.0 || count > f64::from(i32::MAX) {
        bail!("multi_user_stalls: '{value}' is not a whole stall count");
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok(Some(count as i32))
}
