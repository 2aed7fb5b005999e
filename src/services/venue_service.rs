use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::dao::{ArtistDao, DaoBase, DaoLayerError, ShowDao, VenueDao, VenueWithGenres},
    db::entities::venue,
    error::AppError,
    forms::VenueForm,
    services::crud::{CrudErrors, CrudOp, map_create_error, map_dao_error, missing_counterpart},
    services::listing::{
        Scheduled, SearchResults, ShowPartition, VenueArea, group_venues_by_area, partition_shows,
    },
};

const VENUE_ERRORS: CrudErrors = CrudErrors {
    kind: "Venue",
    find_failed: "An error occurred. Venues could not be loaded.",
    not_found: "Venue not found",
    update_failed: "An error occurred. Venue could not be updated.",
    delete_failed: "Venue was not deleted successfully.",
};

/// A show as seen from its venue page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueShow {
    pub artist_id: Uuid,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<FixedOffset>,
}

impl Scheduled for VenueShow {
    fn start_time(&self) -> DateTime<FixedOffset> {
        self.start_time
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: venue::Model,
    pub genres: Vec<String>,
    pub past_shows: Vec<VenueShow>,
    pub upcoming_shows: Vec<VenueShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl VenueDetail {
    fn new(record: VenueWithGenres, shows: ShowPartition<VenueShow>) -> Self {
        Self {
            venue: record.venue,
            genres: record.genres,
            past_shows_count: shows.past_count(),
            upcoming_shows_count: shows.upcoming_count(),
            past_shows: shows.past,
            upcoming_shows: shows.upcoming,
        }
    }
}

#[derive(Clone)]
pub struct VenueService {
    venue_dao: VenueDao,
    artist_dao: ArtistDao,
    show_dao: ShowDao,
}

impl VenueService {
    pub fn new(venue_dao: VenueDao, artist_dao: ArtistDao, show_dao: ShowDao) -> Self {
        Self {
            venue_dao,
            artist_dao,
            show_dao,
        }
    }

    fn map_err(op: CrudOp) -> impl Fn(DaoLayerError) -> AppError {
        move |err| map_dao_error(&VENUE_ERRORS, op, err)
    }

    pub async fn list_areas(&self, now: DateTime<FixedOffset>) -> Result<Vec<VenueArea>, AppError> {
        let venues = self
            .venue_dao
            .list_venues()
            .await
            .map_err(Self::map_err(CrudOp::List))?;
        let counts = self
            .show_dao
            .count_upcoming_by_venue(now, None)
            .await
            .map_err(Self::map_err(CrudOp::List))?;
        Ok(group_venues_by_area(venues, &counts))
    }

    pub async fn latest(&self, limit: u64) -> Result<Vec<venue::Model>, AppError> {
        self.venue_dao
            .latest_venues(limit)
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
            .venue_dao
            .search_by_name(term)
            .await
            .map_err(Self::map_err(CrudOp::List))?;
        let ids: Vec<Uuid> = matches.iter().map(|venue| venue.id).collect();
        let counts = self
            .show_dao
            .count_upcoming_by_venue(now, Some(&ids))
            .await
            .map_err(Self::map_err(CrudOp::List))?;
        Ok(SearchResults::from_matches(
            matches.into_iter().map(|venue| (venue.id, venue.name)),
            &counts,
        ))
    }

    /// Venue, its shows and their artists read in one transaction, then
    /// split against `now`.
    pub async fn detail(
        &self,
        id: &Uuid,
        now: DateTime<FixedOffset>,
    ) -> Result<VenueDetail, AppError> {
        let txn = self
            .venue_dao
            .begin()
            .await
            .map_err(Self::map_err(CrudOp::Find))?;
        let record = self
            .venue_dao
            .find_with_genres_in(&txn, id)
            .await
            .map_err(Self::map_err(CrudOp::Find))?;
        let shows = self
            .show_dao
            .list_for_venue_in(&txn, id)
            .await
            .map_err(Self::map_err(CrudOp::Find))?;

        let artist_ids: Vec<Uuid> = shows
            .iter()
            .map(|show| show.artist_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let artists: HashMap<Uuid, _> = self
            .artist_dao
            .find_many_in(&txn, &artist_ids)
            .await
            .map_err(Self::map_err(CrudOp::Find))?
            .into_iter()
            .map(|artist| (artist.id, artist))
            .collect();
        txn.commit()
            .await
            .map_err(|err| Self::map_err(CrudOp::Find)(DaoLayerError::Db(err)))?;

        let rows = shows
            .into_iter()
            .map(|show| {
                let artist = artists.get(&show.artist_id).ok_or_else(|| {
                    missing_counterpart(&VENUE_ERRORS, show.id, "artist_id", show.artist_id)
                })?;
                Ok(VenueShow {
                    artist_id: artist.id,
                    artist_name: artist.name.clone(),
                    artist_image_link: artist.image_link.clone(),
                    start_time: show.start_time,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(VenueDetail::new(record, partition_shows(rows, now)))
    }

    pub async fn edit_form(&self, id: &Uuid) -> Result<VenueForm, AppError> {
        let record = self
            .venue_dao
            .find_with_genres(id)
            .await
            .map_err(Self::map_err(CrudOp::Find))?;
        Ok(VenueForm::from_record(&record))
    }

    pub async fn create(&self, form: &VenueForm) -> Result<VenueWithGenres, AppError> {
        let input = form.validate()?;
        let created = self
            .venue_dao
            .create_venue(input.to_active_model(), &input.genres)
            .await
            .map_err(|err| map_create_error(&VENUE_ERRORS, &input.name, err))?;
        tracing::info!(venue_id = %created.venue.id, name = %created.venue.name, "venue created");
        Ok(created)
    }

    pub async fn update(&self, id: &Uuid, form: &VenueForm) -> Result<VenueWithGenres, AppError> {
        let input = form.validate()?;
        let updated = self
            .venue_dao
            .update_venue(id, &input.genres, |active| input.apply(active))
            .await
            .map_err(Self::map_err(CrudOp::Update))?;
        tracing::info!(venue_id = %id, "venue updated");
        Ok(updated)
    }

    /// Removes the venue and everything hanging off it. Returns the name of
    /// the deleted venue.
    pub async fn delete(&self, id: &Uuid) -> Result<String, AppError> {
        let venue = self
            .venue_dao
            .find_by_id(*id)
            .await
            .map_err(Self::map_err(CrudOp::Delete))?;
        let removed_shows = self
            .venue_dao
            .delete_venue(id)
            .await
            .map_err(Self::map_err(CrudOp::Delete))?;
        tracing::info!(venue_id = %id, removed_shows, "venue deleted");
        Ok(venue.name)
    }
}
