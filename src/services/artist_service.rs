use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::dao::{ArtistDao, ArtistWithGenres, DaoBase, DaoLayerError, ShowDao, VenueDao},
    db::entities::artist,
    error::AppError,
    forms::ArtistForm,
    services::crud::{CrudErrors, CrudOp, map_create_error, map_dao_error, missing_counterpart},
    services::listing::{Scheduled, SearchResults, ShowPartition, partition_shows},
};

const ARTIST_ERRORS: CrudErrors = CrudErrors {
    kind: "Artist",
    find_failed: "An error occurred. Artists could not be loaded.",
    not_found: "Artist not found",
    update_failed: "An error occurred. Artist could not be updated.",
    delete_failed: "Artist was not deleted successfully.",
};

/// A show as seen from its artist page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistShow {
    pub venue_id: Uuid,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<FixedOffset>,
}

impl Scheduled for ArtistShow {
    fn start_time(&self) -> DateTime<FixedOffset> {
        self.start_time
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: artist::Model,
    pub genres: Vec<String>,
    pub past_shows: Vec<ArtistShow>,
    pub upcoming_shows: Vec<ArtistShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl ArtistDetail {
    fn new(record: ArtistWithGenres, shows: ShowPartition<ArtistShow>) -> Self {
        Self {
            artist: record.artist,
            genres: record.genres,
            past_shows_count: shows.past_count(),
            upcoming_shows_count: shows.upcoming_count(),
            past_shows: shows.past,
            upcoming_shows: shows.upcoming,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistSummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Clone)]
pub struct ArtistService {
    artist_dao: ArtistDao,
    venue_dao: VenueDao,
    show_dao: ShowDao,
}

impl ArtistService {
    pub fn new(artist_dao: ArtistDao, venue_dao: VenueDao, show_dao: ShowDao) -> Self {
        Self {
            artist_dao,
            venue_dao,
            show_dao,
        }
    }

    fn map_err(op: CrudOp) -> impl Fn(DaoLayerError) -> AppError {
        move |err| map_dao_error(&ARTIST_ERRORS, op, err)
    }

    pub async fn list(&self) -> Result<Vec<ArtistSummary>, AppError> {
        let artists = self
            .artist_dao
            .list_artists()
            .await
            .map_err(Self::map_err(CrudOp::List))?;
        Ok(artists
            .into_iter()
            .map(|artist| ArtistSummary {
                id: artist.id,
                name: artist.name,
            })
            .collect())
    }

    pub async fn latest(&self, limit: u64) -> Result<Vec<artist::Model>, AppError> {
        self.artist_dao
            .latest_artists(limit)
            .await
            .map_err(Self::map_err(CrudOp::List))
    }

    /// Matches by name, with upcoming shows counted for the hits only.
    pub async fn search(
        &self,
        term: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<SearchResults, AppError> {
        let matches = self
            .artist_dao
            .search_by_name(term)
            .await
            .map_err(Self::map_err(CrudOp::List))?;
        let ids: Vec<Uuid> = matches.iter().map(|artist| artist.id).collect();
        let counts = self
            .show_dao
            .count_upcoming_by_artist(now, Some(&ids))
            .await
            .map_err(Self::map_err(CrudOp::List))?;
        Ok(SearchResults::from_matches(
            matches.into_iter().map(|artist| (artist.id, artist.name)),
            &counts,
        ))
    }

    /// Artist with its shows and their venues, read in one transaction and
    /// split against `now`.
    pub async fn detail(
        &self,
        id: &Uuid,
        now: DateTime<FixedOffset>,
    ) -> Result<ArtistDetail, AppError> {
        let txn = self
            .artist_dao
            .begin()
            .await
            .map_err(Self::map_err(CrudOp::Find))?;
        let record = self
            .artist_dao
            .find_with_genres_in(&txn, id)
            .await
            .map_err(Self::map_err(CrudOp::Find))?;
        let shows = self
            .show_dao
            .list_for_artist_in(&txn, id)
            .await
            .map_err(Self::map_err(CrudOp::Find))?;

        let venue_ids: Vec<Uuid> = shows
            .iter()
            .map(|show| show.venue_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let venues: HashMap<Uuid, _> = self
            .venue_dao
            .find_many_in(&txn, &venue_ids)
            .await
            .map_err(Self::map_err(CrudOp::Find))?
            .into_iter()
            .map(|venue| (venue.id, venue))
            .collect();
        txn.commit()
            .await
            .map_err(|err| Self::map_err(CrudOp::Find)(DaoLayerError::Db(err)))?;

        let rows = shows
            .into_iter()
            .map(|show| {
                let venue = venues.get(&show.venue_id).ok_or_else(|| {
                    missing_counterpart(&ARTIST_ERRORS, show.id, "venue_id", show.venue_id)
                })?;
                Ok(ArtistShow {
                    venue_id: venue.id,
                    venue_name: venue.name.clone(),
                    venue_image_link: venue.image_link.clone(),
                    start_time: show.start_time,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(ArtistDetail::new(record, partition_shows(rows, now)))
    }

    pub async fn edit_form(&self, id: &Uuid) -> Result<ArtistForm, AppError> {
        let record = self
            .artist_dao
            .find_with_genres(id)
            .await
            .map_err(Self::map_err(CrudOp::Find))?;
        Ok(ArtistForm::from_record(&record))
    }

    pub async fn create(&self, form: &ArtistForm) -> Result<ArtistWithGenres, AppError> {
        let input = form.validate()?;
        let created = self
            .artist_dao
            .create_artist(input.to_active_model(), &input.genres)
            .await
            .map_err(|err| map_create_error(&ARTIST_ERRORS, &input.name, err))?;
        tracing::info!(artist_id = %created.artist.id, name = %created.artist.name, "artist created");
        Ok(created)
    }

    pub async fn update(&self, id: &Uuid, form: &ArtistForm) -> Result<ArtistWithGenres, AppError> {
        let input = form.validate()?;
        let updated = self
            .artist_dao
            .update_artist(id, &input.genres, |active| input.apply(active))
            .await
            .map_err(Self::map_err(CrudOp::Update))?;
        tracing::info!(artist_id = %id, "artist updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &Uuid) -> Result<String, AppError> {
        let artist = self
            .artist_dao
            .find_by_id(*id)
            .await
            .map_err(Self::map_err(CrudOp::Delete))?;
        let removed_shows = self
            .artist_dao
            .delete_artist(id)
            .await
            .map_err(Self::map_err(CrudOp::Delete))?;
        tracing::info!(artist_id = %id, removed_shows, "artist deleted");
        Ok(artist.name)
    }
}
