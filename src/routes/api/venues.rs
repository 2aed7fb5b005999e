use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use super::SearchQuery;
use crate::{
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        listing::{SearchResults, VenueArea},
        venue_service::VenueDetail,
    },
    state::AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/venues", get(list_venues))
        .route("/venues/search", get(search_venues))
        .route("/venues/{id}", get(get_venue))
}

async fn list_venues(State(state): State<Arc<AppState>>) -> ApiResult<Vec<VenueArea>> {
    let areas = ServiceContext::from_state(&state)
        .venue()
        .list_areas(state.now())
        .await?;
    JsonApiResponse::ok(areas)
}

async fn search_venues(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<SearchResults> {
    let results = ServiceContext::from_state(&state)
        .venue()
        .search(&query.search_term, state.now())
        .await?;
    JsonApiResponse::ok(results)
}

async fn get_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<VenueDetail> {
    let detail = ServiceContext::from_state(&state)
        .venue()
        .detail(&id, state.now())
        .await?;
    JsonApiResponse::ok(detail)
}
