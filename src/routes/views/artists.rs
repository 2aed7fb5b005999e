use std::sync::Arc;

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};

use super::{
    ListItem, PageResult, SelectOption, ShowRow,
    errors::{not_found_page, page_error},
    format::format_datetime,
    home::home_page,
    parse_id, render_with_status,
    venues::{SearchTemplate, search_term, show_rows},
};
use crate::{
    error::{AppError, FieldError},
    forms::{ArtistForm, FormPairs, GENRE_CHOICES, STATE_CHOICES},
    services::{
        ServiceContext,
        artist_service::{ArtistDetail, ArtistShow},
    },
    state::AppState,
};

#[derive(Template)]
#[template(path = "pages/artists.html")]
struct ArtistsTemplate {
    artists: Vec<ListItem>,
}

#[derive(Template)]
#[template(path = "pages/show_artist.html")]
struct ShowArtistTemplate {
    detail: ArtistDetail,
    past_shows: Vec<ShowRow>,
    upcoming_shows: Vec<ShowRow>,
}

#[derive(Template)]
#[template(path = "forms/artist.html")]
struct ArtistFormTemplate {
    title: &'static str,
    action: String,
    form: ArtistForm,
    states: Vec<SelectOption>,
    genres: Vec<SelectOption>,
    errors: Vec<FieldError>,
}

impl ArtistFormTemplate {
    fn create(form: ArtistForm, errors: Vec<FieldError>) -> Self {
        Self::new("List a new artist", "/artists/create".to_string(), form, errors)
    }

    fn edit(id: uuid::Uuid, form: ArtistForm, errors: Vec<FieldError>) -> Self {
        Self::new("Edit artist", format!("/artists/{id}/edit"), form, errors)
    }

    fn new(title: &'static str, action: String, form: ArtistForm, errors: Vec<FieldError>) -> Self {
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
        .route("/artists", get(list_artists))
        .route("/artists/search", post(search_artists))
        .route("/artists/create", get(create_form).post(create_artist))
        .route("/artists/{id}", get(show_artist).delete(delete_artist))
        .route("/artists/{id}/edit", get(edit_form).post(update_artist))
}

async fn list_artists(State(state): State<Arc<AppState>>) -> PageResult {
    let artists = ServiceContext::from_state(&state)
        .artist()
        .list()
        .await
        .map_err(page_error)?
        .into_iter()
        .map(|artist| ListItem {
            id: artist.id,
            name: artist.name,
        })
        .collect();
    render_with_status(StatusCode::OK, &ArtistsTemplate { artists })
}

async fn search_artists(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<FormPairs>,
) -> PageResult {
    let search_term = search_term(&pairs);
    let results = ServiceContext::from_state(&state)
        .artist()
        .search(&search_term, state.now())
        .await
        .map_err(page_error)?;
    render_with_status(
        StatusCode::OK,
        &SearchTemplate {
            kind: "artists",
            search_term,
            results,
        },
    )
}

fn artist_show_row(show: &ArtistShow) -> ShowRow {
    ShowRow {
        id: show.venue_id,
        name: show.venue_name.clone(),
        image_link: show.venue_image_link.clone(),
        starts_at: format_datetime(show.start_time),
    }
}

async fn show_artist(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> PageResult {
    let Some(id) = parse_id(&id) else {
        return Err(not_found_page());
    };
    let detail = ServiceContext::from_state(&state)
        .artist()
        .detail(&id, state.now())
        .await
        .map_err(page_error)?;
    let template = ShowArtistTemplate {
        past_shows: show_rows(&detail.past_shows, artist_show_row),
        upcoming_shows: show_rows(&detail.upcoming_shows, artist_show_row),
        detail,
    };
    render_with_status(StatusCode::OK, &template)
}

async fn create_form() -> PageResult {
    render_with_status(
        StatusCode::OK,
        &ArtistFormTemplate::create(ArtistForm::default(), Vec::new()),
    )
}

async fn create_artist(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<FormPairs>,
) -> PageResult {
    let form = ArtistForm::from_pairs(&pairs);
    match ServiceContext::from_state(&state).artist().create(&form).await {
        Ok(created) => {
            let notice = format!("Artist {} was successfully listed!", created.artist.name);
            home_page(&state, Some(notice)).await
        }
        Err(AppError::Validation(errors)) => render_with_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            &ArtistFormTemplate::create(form, errors.iter().cloned().collect()),
        ),
        Err(err) => Err(page_error(err)),
    }
}

async fn edit_form(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> PageResult {
    let Some(id) = parse_id(&id) else {
        return Err(not_found_page());
    };
    let form = ServiceContext::from_state(&state)
        .artist()
        .edit_form(&id)
        .await
        .map_err(page_error)?;
    render_with_status(StatusCode::OK, &ArtistFormTemplate::edit(id, form, Vec::new()))
}

async fn update_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(pairs): Form<FormPairs>,
) -> PageResult {
    let Some(id) = parse_id(&id) else {
        return Err(not_found_page());
    };
    let form = ArtistForm::from_pairs(&pairs);
    match ServiceContext::from_state(&state).artist().update(&id, &form).await {
        Ok(_) => Ok(Redirect::to(&format!("/artists/{id}")).into_response()),
        Err(AppError::Validation(errors)) => render_with_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            &ArtistFormTemplate::edit(id, form, errors.iter().cloned().collect()),
        ),
        Err(err) => Err(page_error(err)),
    }
}

async fn delete_artist(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> PageResult {
    let Some(id) = parse_id(&id) else {
        return Err(not_found_page());
    };
    ServiceContext::from_state(&state)
        .artist()
        .delete(&id)
        .await
        .map_err(page_error)?;
    Ok(Redirect::to("/").into_response())
}
