use super::*;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use radar_core::{MemoryRecordStore, RestroomRecord, RestroomType};
use radar_summarizer::ChatSummarizer;
use tower::ServiceExt;

const CENTER: (f64, f64) = (42.3899, -72.5280);

type TestState = AppState<MemoryRecordStore, ChatSummarizer>;

fn record(id: i64, building: &str, lat_offset: f64) -> RestroomRecord {
    RestroomRecord {
        id,
        building_name: building.to_string(),
        address: Some(format!("{building} Way")),
        geocoded_latitude: Some(CENTER.0 + lat_offset),
        geocoded_longitude: Some(CENTER.1),
        restroom_type: RestroomType::SingleUser,
        within_campus_bbox: true,
        ..RestroomRecord::default()
    }
}

fn state_with(store: MemoryRecordStore) -> TestState {
    AppState::new(SearchService::new(store), 1.2)
}

fn campus_state() -> TestState {
    state_with(MemoryRecordStore::new(vec![
        record(1, "Goodell", 0.001),
        record(2, "Goodell", 0.002),
        record(3, "Du Bois Library", 0.003),
    ]))
}

fn app(state: TestState) -> Router {
    build_app(
        state,
        &["http://localhost:3000".to_string()],
        RateLimitState::per_minute(100),
    )
}

fn search_request(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn center_body() -> serde_json::Value {
    serde_json::json!({ "latitude": CENTER.0, "longitude": CENTER.1 })
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("not_found", StatusCode::NOT_FOUND),
        ("validation_error", StatusCode::BAD_REQUEST),
        ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
        ("service_unavailable", StatusCode::SERVICE_UNAVAILABLE),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, status) in cases {
        let response = ApiError::new("req-1", code, "msg").into_response();
        assert_eq!(response.status(), status, "code {code}");
    }
}

#[test]
fn search_errors_map_to_api_codes() {
    let cases = [
        (SearchError::NoDataAvailable, "not_found"),
        (SearchError::NoCandidatesInRadius, "not_found"),
        (
            SearchError::InvalidQuery(radar_core::QueryError::InvalidRadius(0.0)),
            "validation_error",
        ),
        (
            SearchError::StoreUnavailable("timed out".to_string()),
            "service_unavailable",
        ),
        (SearchError::Unexpected("boom".to_string()), "internal_error"),
    ];
    for (error, code) in cases {
        assert_eq!(map_search_error("req".to_string(), &error).error.code, code);
    }
}

#[tokio::test]
async fn root_returns_greeting() {
    let response = app(campus_state())
        .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["message"].as_str().is_some_and(|m| m.contains("Restroom")));
}

#[tokio::test]
async fn health_reports_ok_and_degraded() {
    let response = app(campus_state())
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["status"], "ok");

    let response = app(state_with(MemoryRecordStore::unavailable("down")))
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(response).await["data"]["status"], "degraded");
}

#[tokio::test]
async fn fast_search_returns_one_group_per_restroom() {
    let response = app(campus_state())
        .oneshot(search_request("/api/v1/restrooms/search", &center_body()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let json = json_body(response).await;
    let data = json["data"].as_array().expect("data array");
    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["building_name"], "Goodell");
    assert_eq!(data[0]["restrooms"][0]["id"], "1");
    assert_eq!(
        data[0]["restrooms"][0]["natural_summary"],
        "Single User restroom in Goodell."
    );
    assert!(data[0]["restrooms"][0]["eta_minutes"].as_u64() >= Some(1));
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn enriched_search_groups_by_building() {
    let response = app(campus_state())
        .oneshot(search_request(
            "/api/v1/restrooms/search/enriched",
            &center_body(),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let data = json["data"].as_array().expect("data array");
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["restrooms"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn empty_store_is_not_found() {
    let response = app(state_with(MemoryRecordStore::default()))
        .oneshot(search_request("/api/v1/restrooms/search", &center_body()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["message"], "no restrooms found in database");
}

#[tokio::test]
async fn nothing_in_radius_is_not_found_on_fast_path_only() {
    let body = serde_json::json!({
        "latitude": CENTER.0,
        "longitude": CENTER.1,
        "radius_miles": 0.01
    });

    let response = app(campus_state())
        .oneshot(search_request("/api/v1/restrooms/search", &body))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await["error"]["message"],
        "no restrooms found within the specified radius"
    );

    let response = app(campus_state())
        .oneshot(search_request("/api/v1/restrooms/search/enriched", &body))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"], serde_json::json!([]));
}

#[tokio::test]
async fn configured_default_radius_applies() {
    // nearest record is about 0.07 mi away
    let state = AppState::new(
        SearchService::new(MemoryRecordStore::new(vec![record(1, "Goodell", 0.001)])),
        0.05,
    );
    let response = app(state)
        .oneshot(search_request("/api/v1/restrooms/search", &center_body()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_query_is_validation_error() {
    let body = serde_json::json!({
        "latitude": CENTER.0,
        "longitude": CENTER.1,
        "radius_miles": -1.0
    });
    let response = app(campus_state())
        .oneshot(search_request("/api/v1/restrooms/search", &body))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"]["code"], "validation_error");

    let body = serde_json::json!({ "latitude": 95.0, "longitude": CENTER.1 });
    let response = app(campus_state())
        .oneshot(search_request("/api/v1/restrooms/search", &body))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_body_is_validation_error() {
    let body = serde_json::json!({ "latitude": "north" });
    let response = app(campus_state())
        .oneshot(search_request("/api/v1/restrooms/search", &body))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"]["code"], "validation_error");
}

#[tokio::test]
async fn unavailable_store_is_service_unavailable() {
    let response = app(state_with(MemoryRecordStore::unavailable("pool timed out")))
        .oneshot(search_request("/api/v1/restrooms/search", &center_body()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        json_body(response).await["error"]["code"],
        "service_unavailable"
    );
}

#[tokio::test]
async fn search_routes_are_rate_limited_but_health_is_not() {
    let app = build_app(campus_state(), &[], RateLimitState::per_minute(1));

    let first = app
        .clone()
        .oneshot(search_request("/api/v1/restrooms/search", &center_body()))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .clone()
        .oneshot(search_request("/api/v1/restrooms/search", &center_body()))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

    let health = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(health.status(), StatusCode::OK);
}

#[tokio::test]
async fn cors_allows_configured_origin_only() {
    let preflight = |origin: &str| {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/v1/restrooms/search")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .expect("request")
    };

    let allowed = app(campus_state())
        .oneshot(preflight("http://localhost:3000"))
        .await
        .expect("response");
    assert_eq!(
        allowed
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(HeaderValue::as_bytes),
        Some(&b"http://localhost:3000"[..])
    );

    let denied = app(campus_state())
        .oneshot(preflight("https://evil.example"))
        .await
        .expect("response");
    assert!(denied
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
