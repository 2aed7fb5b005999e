use std::sync::Arc;

use axum::{Router, middleware};

use super::middleware::{json_error_middleware, json_panic_layer};
use crate::{error::AppError, response::ApiError, state::AppState};

pub mod artists;
pub mod shows;
pub mod venues;

#[derive(Debug, serde::Deserialize, Default)]
pub struct SearchQuery {
    #[serde(default)]
    pub search_term: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(venues::router())
        .merge(artists::router())
        .merge(shows::router())
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(json_error_middleware))
        .layer(json_panic_layer())
}

async fn not_found() -> ApiError {
    AppError::not_found("Not Found").into()
}
