use std::sync::Arc;

use axum::{Router, extract::State, routing::get};

use crate::{
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, show_service::ShowListing},
    state::AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/shows", get(list_shows))
}

async fn list_shows(State(state): State<Arc<AppState>>) -> ApiResult<Vec<ShowListing>> {
    let shows = ServiceContext::from_state(&state).show().list().await?;
    JsonApiResponse::ok(shows)
}
