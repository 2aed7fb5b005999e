use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::dao::{ArtistDao, DaoBase, DaoLayerError, ShowDao, VenueDao},
    db::entities::show,
    error::AppError,
    forms::ShowForm,
    services::crud::{CrudErrors, CrudOp, map_dao_error, missing_counterpart},
};

const SHOW_ERRORS: CrudErrors = CrudErrors {
    kind: "Show",
    find_failed: "An error occurred. Shows could not be loaded.",
    not_found: "Show not found",
    update_failed: "An error occurred. Show could not be updated.",
    delete_failed: "An error occurred. Show could not be deleted.",
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowListing {
    pub venue_id: Uuid,
    pub venue_name: String,
    pub artist_id: Uuid,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<FixedOffset>,
}

/// An `(id, name)` pair offered by the show form's selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShowChoices {
    pub artists: Vec<Choice>,
    pub venues: Vec<Choice>,
}

#[derive(Clone)]
pub struct ShowService {
    show_dao: ShowDao,
    artist_dao: ArtistDao,
    venue_dao: VenueDao,
}

impl ShowService {
    pub fn new(show_dao: ShowDao, artist_dao: ArtistDao, venue_dao: VenueDao) -> Self {
        Self {
            show_dao,
            artist_dao,
            venue_dao,
        }
    }

    fn map_err(op: CrudOp) -> impl Fn(DaoLayerError) -> AppError {
        move |err| map_dao_error(&SHOW_ERRORS, op, err)
    }

    /// Every show by start time, with artist and venue names joined in. All
    /// three reads share one transaction.
    pub async fn list(&self) -> Result<Vec<ShowListing>, AppError> {
        let txn = self
            .show_dao
            .begin()
            .await
            .map_err(Self::map_err(CrudOp::List))?;
        let shows = self
            .show_dao
            .list_shows_in(&txn)
            .await
            .map_err(Self::map_err(CrudOp::List))?;
        let artist_ids = distinct(shows.iter().map(|show| show.artist_id));
        let venue_ids = distinct(shows.iter().map(|show| show.venue_id));

        let artists: HashMap<Uuid, _> = self
            .artist_dao
            .find_many_in(&txn, &artist_ids)
            .await
            .map_err(Self::map_err(CrudOp::List))?
            .into_iter()
            .map(|artist| (artist.id, artist))
            .collect();
        let venues: HashMap<Uuid, _> = self
            .venue_dao
            .find_many_in(&txn, &venue_ids)
            .await
            .map_err(Self::map_err(CrudOp::List))?
            .into_iter()
            .map(|venue| (venue.id, venue))
            .collect();
        txn.commit()
            .await
            .map_err(|err| Self::map_err(CrudOp::List)(DaoLayerError::Db(err)))?;

        shows
            .into_iter()
            .map(|show| {
                let artist = artists.get(&show.artist_id).ok_or_else(|| {
                    missing_counterpart(&SHOW_ERRORS, show.id, "artist_id", show.artist_id)
                })?;
                let venue = venues.get(&show.venue_id).ok_or_else(|| {
                    missing_counterpart(&SHOW_ERRORS, show.id, "venue_id", show.venue_id)
                })?;
                Ok(ShowListing {
                    venue_id: venue.id,
                    venue_name: venue.name.clone(),
                    artist_id: artist.id,
                    artist_name: artist.name.clone(),
                    artist_image_link: artist.image_link.clone(),
                    start_time: show.start_time,
                })
            })
            .collect()
    }

    pub async fn choices(&self) -> Result<ShowChoices, AppError> {
        let artists = self
            .artist_dao
            .list_artists()
            .await
            .map_err(Self::map_err(CrudOp::List))?;
        let venues = self
            .venue_dao
            .list_venues()
            .await
            .map_err(Self::map_err(CrudOp::List))?;
        Ok(ShowChoices {
            artists: artists
                .into_iter()
                .map(|artist| Choice {
                    id: artist.id,
                    name: artist.name,
                })
                .collect(),
            venues: venues
                .into_iter()
                .map(|venue| Choice {
                    id: venue.id,
                    name: venue.name,
                })
                .collect(),
        })
    }

    pub async fn create(&self, form: &ShowForm) -> Result<show::Model, AppError> {
        let input = form.validate()?;
        let created = self
            .show_dao
            .create_show(&input.artist_id, &input.venue_id, input.start_time)
            .await
            .map_err(Self::map_err(CrudOp::Create))?;
        tracing::info!(
            show_id = %created.id,
            artist_id = %created.artist_id,
            venue_id = %created.venue_id,
            "show created"
        );
        Ok(created)
    }
}

fn distinct(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.collect();
    ids.sort();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use crate::db::entities::{artist, show, venue};
    use crate::error::AppError;
    use crate::forms::ShowForm;
    use crate::services::ServiceContext;

    #[tokio::test]
    async fn create_rejects_unknown_artist() {
        let venue_id = Uuid::new_v4();
        let now = chrono::Utc::now().fixed_offset();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<artist::Model>::new()])
            .append_query_results([[venue::Model {
                id: venue_id,
                created_at: now,
                updated_at: now,
                name: "The Musical Hop".to_string(),
                search_name: "the musical hop".to_string(),
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                address: "1015 Folsom Street".to_string(),
                phone: None,
                image_link: None,
                facebook_link: None,
                website_link: None,
                seeking_talent: true,
                seeking_description: None,
            }]])
            .into_connection();
        let service = ServiceContext::new(&db).show();
        let form = ShowForm {
            artist_id: Uuid::new_v4().to_string(),
            venue_id: venue_id.to_string(),
            start_time: "2035-04-01T20:00:00Z".to_string(),
        };

        let err = service.create(&form).await.expect_err("create should fail");
        match err {
            AppError::Validation(errors) => {
                assert!(errors.has("artist_id"));
                assert!(!errors.has("venue_id"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_is_empty_without_extra_lookups() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<show::Model>::new()])
            .into_connection();
        let service = ServiceContext::new(&db).show();

        let shows = service.list().await.expect("list should succeed");
        assert!(shows.is_empty());
    }

    #[tokio::test]
    async fn list_fails_loudly_when_a_show_venue_is_gone() {
        let now = chrono::Utc::now().fixed_offset();
        let artist_id = Uuid::from_u128(1);
        let show = show::Model {
            id: Uuid::from_u128(10),
            created_at: now,
            updated_at: now,
            artist_id,
            venue_id: Uuid::from_u128(2),
            start_time: now,
        };
        let artist = artist::Model {
            id: artist_id,
            created_at: now,
            updated_at: now,
            name: "Matt Quevedo".to_string(),
            search_name: "matt quevedo".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            phone: None,
            image_link: None,
            facebook_link: None,
            website_link: None,
            seeking_venue: false,
            seeking_description: None,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[show]])
            .append_query_results([[artist]])
            .append_query_results([Vec::<venue::Model>::new()])
            .into_connection();
        let service = ServiceContext::new(&db).show();

        let err = service.list().await.expect_err("list should fail");
        assert!(matches!(
            err,
            AppError::Persistence(message) if message == "An error occurred. Shows could not be loaded."
        ));
    }
}
