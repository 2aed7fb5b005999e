use std::sync::Arc;

use askama::Template;
use axum::{Router, extract::State, routing::get};

use super::{ListItem, PageResult, errors::page_error, render_with_status};
use crate::{error::AppError, services::ServiceContext, state::AppState};

const LATEST_LIMIT: u64 = 10;

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub notice: Option<String>,
    pub venues: Vec<ListItem>,
    pub artists: Vec<ListItem>,
}

impl HomeTemplate {
    pub fn with_notice(notice: impl Into<String>) -> Self {
        Self {
            notice: Some(notice.into()),
            venues: Vec::new(),
            artists: Vec::new(),
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}

async fn index(State(state): State<Arc<AppState>>) -> PageResult {
    home_page(&state, None).await
}

/// The home page after a write, carrying the outcome as a notice.
pub(crate) async fn home_page(state: &AppState, notice: Option<String>) -> PageResult {
    let template = latest(state, notice).await.map_err(page_error)?;
    render_with_status(axum::http::StatusCode::OK, &template)
}

async fn latest(state: &AppState, notice: Option<String>) -> Result<HomeTemplate, AppError> {
    let services = ServiceContext::from_state(state);
    let venues = services.venue().latest(LATEST_LIMIT).await?;
    let artists = services.artist().latest(LATEST_LIMIT).await?;
    Ok(HomeTemplate {
        notice,
        venues: venues
            .into_iter()
            .map(|venue| ListItem {
                id: venue.id,
                name: venue.name,
            })
            .collect(),
        artists: artists
            .into_iter()
            .map(|artist| ListItem {
                id: artist.id,
                name: artist.name,
            })
            .collect(),
    })
}
