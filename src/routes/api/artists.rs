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
        artist_service::{ArtistDetail, ArtistSummary},
        listing::SearchResults,
    },
    state::AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/artists", get(list_artists))
        .route("/artists/search", get(search_artists))
        .route("/artists/{id}", get(get_artist))
}

async fn list_artists(State(state): State<Arc<AppState>>) -> ApiResult<Vec<ArtistSummary>> {
    let artists = ServiceContext::from_state(&state).artist().list().await?;
    JsonApiResponse::ok(artists)
}

async fn search_artists(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<SearchResults> {
    let results = ServiceContext::from_state(&state)
        .artist()
        .search(&query.search_term, state.now())
        .await?;
    JsonApiResponse::ok(results)
}

async fn get_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<ArtistDetail> {
    let detail = ServiceContext::from_state(&state)
        .artist()
        .detail(&id, state.now())
        .await?;
    JsonApiResponse::ok(detail)
}
