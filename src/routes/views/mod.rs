use std::{path::PathBuf, sync::Arc};

use askama::Template;
use axum::{
    Router,
    handler::HandlerWithoutStateExt,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use tower_http::services::ServeDir;
use uuid::Uuid;

use crate::state::AppState;

pub mod artists;
pub mod errors;
pub mod format;
pub mod home;
pub mod shows;
pub mod venues;

pub(crate) type HtmlError = (StatusCode, Html<String>);
pub(crate) type PageResult = Result<Response, HtmlError>;

pub fn router(state: Arc<AppState>) -> Router {
    let public_dir = resolve_public_dir();
    Router::new()
        .merge(home::router())
        .merge(venues::router())
        .merge(artists::router())
        .merge(shows::router())
        .with_state(state)
        .route_service(
            "/{*file}",
            ServeDir::new(public_dir).not_found_service(errors::fallback.into_service()),
        )
}

fn resolve_public_dir() -> PathBuf {
    if let Some(path) = std::env::var_os("APP_PUBLIC_DIR") {
        return PathBuf::from(path);
    }

    if let Ok(current_dir) = std::env::current_dir() {
        let candidate = current_dir.join("public");
        if candidate.exists() {
            return candidate;
        }
    }

    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("public")
}

pub(crate) fn render<T: Template>(template: &T) -> Result<Html<String>, HtmlError> {
    template.render().map(Html).map_err(|err| {
        tracing::error!(error = %err, "failed to render template");
        html_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to render page")
    })
}

pub(crate) fn render_with_status<T: Template>(status: StatusCode, template: &T) -> PageResult {
    render(template).map(|html| (status, html).into_response())
}

pub(crate) fn html_error(status: StatusCode, message: &'static str) -> HtmlError {
    (status, Html(message.to_string()))
}

/// Path ids that are not UUIDs name nothing, so they read as missing pages.
pub(crate) fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

/// A show line on a detail page: the counterpart's link data plus a
/// formatted start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowRow {
    pub id: Uuid,
    pub name: String,
    pub image_link: Option<String>,
    pub starts_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub id: Uuid,
    pub name: String,
}

/// One `<option>` of a select, with its selection precomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn from_choices(choices: &[&str], selected: &[String]) -> Vec<Self> {
        choices
            .iter()
            .map(|choice| Self {
                value: choice.to_string(),
                label: choice.to_string(),
                selected: selected.iter().any(|value| value == choice),
            })
            .collect()
    }
}
