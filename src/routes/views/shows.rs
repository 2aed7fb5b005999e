use std::sync::Arc;

use askama::Template;
use axum::{Form, Router, extract::State, http::StatusCode, routing::get};
use uuid::Uuid;

use super::{
    PageResult, SelectOption,
    errors::page_error,
    format::format_datetime,
    home::home_page,
    render_with_status,
};
use crate::{
    error::{AppError, FieldError},
    forms::{FormPairs, ShowForm},
    services::{ServiceContext, show_service::Choice},
    state::AppState,
};

/// A row of the shows listing.
struct ShowLine {
    venue_id: Uuid,
    venue_name: String,
    artist_id: Uuid,
    artist_name: String,
    artist_image_link: Option<String>,
    starts_at: String,
}

#[derive(Template)]
#[template(path = "pages/shows.html")]
struct ShowsTemplate {
    shows: Vec<ShowLine>,
}

#[derive(Template)]
#[template(path = "forms/new_show.html")]
struct ShowFormTemplate {
    form: ShowForm,
    artists: Vec<SelectOption>,
    venues: Vec<SelectOption>,
    errors: Vec<FieldError>,
}

fn options(choices: Vec<Choice>, selected: &str) -> Vec<SelectOption> {
    choices
        .into_iter()
        .map(|choice| {
            let value = choice.id.to_string();
            SelectOption {
                selected: value == selected.trim(),
                value,
                label: choice.name,
            }
        })
        .collect()
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shows", get(list_shows))
        .route("/shows/create", get(create_form).post(create_show))
}

async fn list_shows(State(state): State<Arc<AppState>>) -> PageResult {
    let shows = ServiceContext::from_state(&state)
        .show()
        .list()
        .await
        .map_err(page_error)?
        .into_iter()
        .map(|show| ShowLine {
            venue_id: show.venue_id,
            venue_name: show.venue_name,
            artist_id: show.artist_id,
            artist_name: show.artist_name,
            artist_image_link: show.artist_image_link,
            starts_at: format_datetime(show.start_time),
        })
        .collect();
    render_with_status(StatusCode::OK, &ShowsTemplate { shows })
}

async fn form_page(
    state: &AppState,
    status: StatusCode,
    form: ShowForm,
    errors: Vec<FieldError>,
) -> PageResult {
    let choices = ServiceContext::from_state(state)
        .show()
        .choices()
        .await
        .map_err(page_error)?;
    let template = ShowFormTemplate {
        artists: options(choices.artists, &form.artist_id),
        venues: options(choices.venues, &form.venue_id),
        form,
        errors,
    };
    render_with_status(status, &template)
}

async fn create_form(State(state): State<Arc<AppState>>) -> PageResult {
    let form = ShowForm::with_start_time(state.now());
    form_page(&state, StatusCode::OK, form, Vec::new()).await
}

async fn create_show(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<FormPairs>,
) -> PageResult {
    let form = ShowForm::from_pairs(&pairs);
    match ServiceContext::from_state(&state).show().create(&form).await {
        Ok(_) => home_page(&state, Some("Show was successfully listed!".to_string())).await,
        Err(AppError::Validation(errors)) => {
            form_page(
                &state,
                StatusCode::UNPROCESSABLE_ENTITY,
                form,
                errors.iter().cloned().collect(),
            )
            .await
        }
        Err(err) => Err(page_error(err)),
    }
}
