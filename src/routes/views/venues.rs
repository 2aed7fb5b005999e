use std::sync::Arc;

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::get,
};

use super::{
    PageResult, SelectOption, ShowRow,
    errors::{not_found_page, page_error},
    format::format_datetime,
    home::home_page,
    parse_id, render_with_status,
};
use crate::{
    error::{AppError, FieldError},
    forms::{FormPairs, GENRE_CHOICES, STATE_CHOICES, VenueForm},
    services::{
        ServiceContext,
        listing::{SearchResults, VenueArea},
        venue_service::{VenueDetail, VenueShow},
    },
    state::AppState,
};

#[derive(Template)]
#[template(path = "pages/venues.html")]
struct VenuesTemplate {
    areas: Vec<VenueArea>,
}

#[derive(Template)]
#[template(path = "pages/search.html")]
pub(crate) struct SearchTemplate {
    pub kind: &'static str,
    pub search_term: String,
    pub results: SearchResults,
}

#[derive(Template)]
#[template(path = "pages/show_venue.html")]
struct ShowVenueTemplate {
    detail: VenueDetail,
    past_shows: Vec<ShowRow>,
    upcoming_shows: Vec<ShowRow>,
}

#[derive(Template)]
#[template(path = "forms/venue.html")]
struct VenueFormTemplate {
    title: &'static str,
    action: String,
    form: VenueForm,
    states: Vec<SelectOption>,
    genres: Vec<SelectOption>,
    errors: Vec<FieldError>,
}

impl VenueFormTemplate {
    fn new(title: &'static str, action: String, form: VenueForm, errors: Vec<FieldError>) -> Self {
        Self {
            title,
            action,
            states: SelectOption::from_choices(STATE_CHOICES, std::slice::from_ref(&form.state)),
            genres: SelectOption::from_choices(GENRE_CHOICES, &form.genres),
            form,
            errors,
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/venues", get(list_venues))
        .route("/venues/search", axum::routing::post(search_venues))
        .route("/venues/create", get(create_form).post(create_venue))
        .route("/venues/{id}", get(show_venue).delete(delete_venue))
        .route("/venues/{id}/edit", get(edit_form).post(update_venue))
}

async fn list_venues(State(state): State<Arc<AppState>>) -> PageResult {
    let areas = ServiceContext::from_state(&state)
        .venue()
        .list_areas(state.now())
        .await
        .map_err(page_error)?;
    render_with_status(StatusCode::OK, &VenuesTemplate { areas })
}

async fn search_venues(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<FormPairs>,
) -> PageResult {
    let search_term = search_term(&pairs);
    let results = ServiceContext::from_state(&state)
        .venue()
        .search(&search_term, state.now())
        .await
        .map_err(page_error)?;
    render_with_status(
        StatusCode::OK,
        &SearchTemplate {
            kind: "venues",
            search_term,
            results,
        },
    )
}

pub(crate) fn search_term(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .find(|(key, _)| key == "search_term")
        .map(|(_, value)| value.clone())
        .unwrap_or_default()
}

pub(crate) fn show_rows<T, F>(shows: &[T], row: F) -> Vec<ShowRow>
where
    F: Fn(&T) -> ShowRow,
{
    shows.iter().map(row).collect()
}

fn venue_show_row(show: &VenueShow) -> ShowRow {
    ShowRow {
        id: show.artist_id,
        name: show.artist_name.clone(),
        image_link: show.artist_image_link.clone(),
        starts_at: format_datetime(show.start_time),
    }
}

async fn show_venue(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> PageResult {
    let Some(id) = parse_id(&id) else {
        return Err(not_found_page());
    };
    let detail = ServiceContext::from_state(&state)
        .venue()
        .detail(&id, state.now())
        .await
        .map_err(page_error)?;
    let template = ShowVenueTemplate {
        past_shows: show_rows(&detail.past_shows, venue_show_row),
        upcoming_shows: show_rows(&detail.upcoming_shows, venue_show_row),
        detail,
    };
    render_with_status(StatusCode::OK, &template)
}

async fn create_form() -> PageResult {
    let template = VenueFormTemplate::new(
        "List a new venue",
        "/venues/create".to_string(),
        VenueForm::default(),
        Vec::new(),
    );
    render_with_status(StatusCode::OK, &template)
}

async fn create_venue(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<FormPairs>,
) -> PageResult {
    let form = VenueForm::from_pairs(&pairs);
    match ServiceContext::from_state(&state).venue().create(&form).await {
        Ok(created) => {
            let notice = format!("Venue {} was successfully listed!", created.venue.name);
            home_page(&state, Some(notice)).await
        }
        Err(AppError::Validation(errors)) => {
            let template = VenueFormTemplate::new(
                "List a new venue",
                "/venues/create".to_string(),
                form,
                errors.iter().cloned().collect(),
            );
            render_with_status(StatusCode::UNPROCESSABLE_ENTITY, &template)
        }
        Err(err) => Err(page_error(err)),
    }
}

async fn edit_form(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> PageResult {
    let Some(id) = parse_id(&id) else {
        return Err(not_found_page());
    };
    let form = ServiceContext::from_state(&state)
        .venue()
        .edit_form(&id)
        .await
        .map_err(page_error)?;
    let template = VenueFormTemplate::new("Edit venue", format!("/venues/{id}/edit"), form, Vec::new());
    render_with_status(StatusCode::OK, &template)
}

async fn update_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(pairs): Form<FormPairs>,
) -> PageResult {
    let Some(id) = parse_id(&id) else {
        return Err(not_found_page());
    };
    let form = VenueForm::from_pairs(&pairs);
    match ServiceContext::from_state(&state).venue().update(&id, &form).await {
        Ok(_) => Ok(Redirect::to(&format!("/venues/{id}")).into_response()),
        Err(AppError::Validation(errors)) => {
            let template = VenueFormTemplate::new(
                "Edit venue",
                format!("/venues/{id}/edit"),
                form,
                errors.iter().cloned().collect(),
            );
            render_with_status(StatusCode::UNPROCESSABLE_ENTITY, &template)
        }
        Err(err) => Err(page_error(err)),
    }
}

async fn delete_venue(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> PageResult {
    let Some(id) = parse_id(&id) else {
        return Err(not_found_page());
    };
    ServiceContext::from_state(&state)
        .venue()
        .delete(&id)
        .await
        .map_err(page_error)?;
    Ok(Redirect::to("/").into_response())
}
