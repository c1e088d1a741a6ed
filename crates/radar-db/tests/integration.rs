//! Offline tests for radar-db pool configuration and row conversion.
//! These tests do not require a live database connection.

use chrono::Utc;
use radar_core::{AppConfig, Environment, RestroomRecord, RestroomType};
use radar_db::{PoolConfig, RestroomRow, INSERT_BATCH_SIZE};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

fn row() -> RestroomRow {
    RestroomRow {
        id: 7,
        building_name: "Goodell".to_string(),
        floor_or_area: Some("Floor 1".to_string()),
        address: Some("154 Hicks Way".to_string()),
        latitude: Some(42.3881),
        longitude: Some(-72.5283),
        rooms: Some("101".to_string()),
        restroom_type: Some("multi-user".to_string()),
        multi_user_stalls: Some(3),
        has_shower: false,
        staff_only_any: true,
        notes: None,
        formatted_address_google: Some("154 Hicks Way, Amherst, MA 01003".to_string()),
        latitude_google: Some(42.3885),
        longitude_google: Some(-72.5290),
        google_maps_url: None,
        google_directions_url: Some("https://maps.example/dir".to_string()),
        within_campus_bbox: true,
        created_at: Utc::now(),
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        default_radius_miles: 1.2,
        cors_origins: vec![],
        rate_limit_per_minute: 120,
        openai_api_key: None,
        summarizer_base_url: "https://api.openai.com/v1".to_string(),
        summarizer_model: "gpt-4o-mini".to_string(),
        summarizer_timeout_secs: 20,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn row_converts_to_record() {
    let record = RestroomRecord::from(row());

    assert_eq!(record.id, 7);
    assert_eq!(record.restroom_type, RestroomType::MultiUser);
    assert_eq!(record.multi_user_stalls, Some(3));
    assert!(record.staff_only);
    assert_eq!(record.coordinates(), Some((42.3885, -72.5290)));
    assert_eq!(record.display_address(), "154 Hicks Way, Amherst, MA 01003");
    assert_eq!(record.maps_url, None);
}

#[test]
fn missing_type_becomes_generic_restroom() {
    let mut r = row();
    r.restroom_type = None;
    r.multi_user_stalls = Some(-1);
    let record = RestroomRecord::from(r);
    assert_eq!(record.restroom_type.as_str(), "restroom");
    assert_eq!(record.multi_user_stalls, None);
}

#[test]
fn insert_batch_size_is_fifty() {
    assert_eq!(INSERT_BATCH_SIZE, 50);
}
