use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use radar_core::{
    DescriptionGenerator, LocationGroup, LocationQuery, RecordStore, SearchError, SearchMode,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_search_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SearchRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub radius_miles: Option<f64>,
}

type SearchResult = Result<Json<ApiResponse<Vec<LocationGroup>>>, ApiError>;

pub(super) async fn search_restrooms<S, G>(
    State(state): State<AppState<S, G>>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> SearchResult
where
    S: RecordStore,
    G: DescriptionGenerator,
{
    run_search(&state, req_id, body, SearchMode::Fast).await
}

pub(super) async fn search_restrooms_enriched<S, G>(
    State(state): State<AppState<S, G>>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> SearchResult
where
    S: RecordStore,
    G: DescriptionGenerator,
{
    run_search(&state, req_id, body, SearchMode::Enriched).await
}

async fn run_search<S, G>(
    state: &AppState<S, G>,
    req_id: RequestId,
    body: Result<Json<SearchRequest>, JsonRejection>,
    mode: SearchMode,
) -> SearchResult
where
    S: RecordStore,
    G: DescriptionGenerator,
{
    let Json(request) = body.map_err(|rejection| {
        ApiError::new(req_id.0.clone(), "validation_error", rejection.body_text())
    })?;

    let query = LocationQuery::with_default_radius(
        request.latitude,
        request.longitude,
        request.radius_miles,
        state.default_radius_miles,
    )
    .map_err(|e| map_search_error(req_id.0.clone(), &SearchError::from(e)))?;

    let groups = state
        .service
        .search(&query, mode)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    tracing::info!(
        request_id = %req_id.0,
        mode = mode.as_str(),
        groups = groups.len(),
        "search completed"
    );

    Ok(Json(ApiResponse {
        data: groups,
        meta: ResponseMeta::new(req_id.0),
    }))
}
