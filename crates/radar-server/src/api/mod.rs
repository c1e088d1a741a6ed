mod search;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use radar_core::{DescriptionGenerator, RecordStore, SearchError, SearchService};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::middleware::{
    enforce_rate_limit, request_id, RateLimitState, RequestId, REQUEST_ID_HEADER,
};

/// Shared handler state. Cloned per request, so the service sits behind an `Arc`.
pub struct AppState<S, G> {
    pub service: Arc<SearchService<S, G>>,
    /// Radius used when a request omits `radius_miles`.
    pub default_radius_miles: f64,
}

impl<S, G> Clone for AppState<S, G> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            default_radius_miles: self.default_radius_miles,
        }
    }
}

impl<S, G> AppState<S, G>
where
    S: RecordStore,
    G: DescriptionGenerator,
{
    #[must_use]
    pub fn new(service: SearchService<S, G>, default_radius_miles: f64) -> Self {
        Self {
            service: Arc::new(service),
            default_radius_miles,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "service_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_search_error(request_id: String, error: &SearchError) -> ApiError {
    match error {
        SearchError::NoDataAvailable | SearchError::NoCandidatesInRadius => {
            tracing::info!(request_id = %request_id, error = %error, "search found nothing");
            ApiError::new(request_id, "not_found", error.to_string())
        }
        SearchError::InvalidQuery(e) => ApiError::new(request_id, "validation_error", e.to_string()),
        SearchError::StoreUnavailable(msg) => {
            tracing::warn!(request_id = %request_id, error = %msg, "record store unavailable");
            ApiError::new(request_id, "service_unavailable", "record store unavailable")
        }
        SearchError::Unexpected(msg) => {
            tracing::error!(request_id = %request_id, error = %msg, "search failed");
            ApiError::new(request_id, "internal_error", format!("error searching restrooms: {msg}"))
        }
    }
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

fn search_router<S, G>(rate_limit: RateLimitState) -> Router<AppState<S, G>>
where
    S: RecordStore + 'static,
    G: DescriptionGenerator + 'static,
{
    Router::new()
        .route(
            "/api/v1/restrooms/search",
            post(search::search_restrooms::<S, G>),
        )
        .route(
            "/api/v1/restrooms/search/enriched",
            post(search::search_restrooms_enriched::<S, G>),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app<S, G>(
    state: AppState<S, G>,
    cors_origins: &[String],
    rate_limit: RateLimitState,
) -> Router
where
    S: RecordStore + 'static,
    G: DescriptionGenerator + 'static,
{
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/api/v1/health", get(health::<S, G>));

    Router::new()
        .merge(public_routes)
        .merge(search_router::<S, G>(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors(cors_origins))
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Restroom Radar API - when you gotta go, you gotta go!"
    }))
}

async fn health<S, G>(
    State(state): State<AppState<S, G>>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse
where
    S: RecordStore,
    G: DescriptionGenerator,
{
    let meta = ResponseMeta::new(req_id.0);

    match state.service.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: record store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
