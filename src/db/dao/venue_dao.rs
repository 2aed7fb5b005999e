use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Select, Set,
};
use uuid::Uuid;

use super::search::name_contains;
use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::prelude::{Show, Venue, VenueGenre};
use crate::db::entities::{show, venue, venue_genre};

#[derive(Clone)]
pub struct VenueDao {
    db: DatabaseConnection,
}

impl DaoBase for VenueDao {
    type Entity = Venue;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Clone)]
struct VenueGenreDao {
    db: DatabaseConnection,
}

impl DaoBase for VenueGenreDao {
    type Entity = VenueGenre;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueWithGenres {
    pub venue: venue::Model,
    pub genres: Vec<String>,
}

impl VenueDao {
    fn genre_dao(&self) -> VenueGenreDao {
        VenueGenreDao::new(&self.db)
    }

    pub async fn create_venue(
        &self,
        data: venue::ActiveModel,
        genres: &[String],
    ) -> DaoResult<VenueWithGenres> {
        let txn = self.begin().await?;
        let venue = self.create_in(&txn, data).await?;
        self.insert_genres(&txn, &venue.id, genres).await?;
        txn.commit().await.map_err(DaoLayerError::Db)?;
        Ok(VenueWithGenres {
            venue,
            genres: genres.to_vec(),
        })
    }

    /// Overwrites the venue columns set by `apply` and replaces its genre list.
    pub async fn update_venue<F>(
        &self,
        id: &Uuid,
        genres: &[String],
        apply: F,
    ) -> DaoResult<VenueWithGenres>
    where
        F: for<'a> FnOnce(&'a mut venue::ActiveModel) + Send,
    {
        let txn = self.begin().await?;
        let venue = self.update_in(&txn, *id, apply).await?;
        VenueGenre::delete_many()
            .filter(venue_genre::Column::VenueId.eq(*id))
            .exec(&txn)
            .await
            .map_err(DaoLayerError::Db)?;
        self.insert_genres(&txn, id, genres).await?;
        txn.commit().await.map_err(DaoLayerError::Db)?;
        Ok(VenueWithGenres {
            venue,
            genres: genres.to_vec(),
        })
    }

    /// Deletes the venue with its shows and genres. Returns the number of
    /// shows removed.
    pub async fn delete_venue(&self, id: &Uuid) -> DaoResult<u64> {
        let txn = self.begin().await?;
        let removed_shows = Show::delete_many()
            .filter(show::Column::VenueId.eq(*id))
            .exec(&txn)
            .await
            .map_err(DaoLayerError::Db)?
            .rows_affected;
        VenueGenre::delete_many()
            .filter(venue_genre::Column::VenueId.eq(*id))
            .exec(&txn)
            .await
            .map_err(DaoLayerError::Db)?;
        self.delete_in(&txn, *id).await?;
        txn.commit().await.map_err(DaoLayerError::Db)?;
        Ok(removed_shows)
    }

    pub async fn find_with_genres(&self, id: &Uuid) -> DaoResult<VenueWithGenres> {
        self.find_with_genres_in(&self.db, id).await
    }

    pub async fn find_with_genres_in<C>(&self, conn: &C, id: &Uuid) -> DaoResult<VenueWithGenres>
    where
        C: ConnectionTrait + Sync,
    {
        let venue = self.find_by_id_in(conn, *id).await?;
        let id = *id;
        let genres = self
            .genre_dao()
            .select_all_in(conn, move |query| {
                query
                    .filter(venue_genre::Column::VenueId.eq(id))
                    .order_by_asc(venue_genre::Column::Position)
                    .order_by_asc(venue_genre::Column::Id)
            })
            .await?
            .into_iter()
            .map(|row| row.name)
            .collect();
        Ok(VenueWithGenres { venue, genres })
    }

    /// Every venue, by name then id.
    pub async fn list_venues(&self) -> DaoResult<Vec<venue::Model>> {
        self.select_all_in(&self.db, by_name).await
    }

    /// Most recently created venues first.
    pub async fn latest_venues(&self, limit: u64) -> DaoResult<Vec<venue::Model>> {
        self.find(1, limit, None, |query| query)
            .await
            .map(|response| response.data)
    }

    pub async fn search_by_name(&self, term: &str) -> DaoResult<Vec<venue::Model>> {
        let condition = name_contains(venue::Column::SearchName, term);
        self.select_all_in(&self.db, move |query| by_name(query.filter(condition)))
            .await
    }

    pub async fn find_many_in<C>(&self, conn: &C, ids: &[Uuid]) -> DaoResult<Vec<venue::Model>>
    where
        C: ConnectionTrait + Sync,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = ids.to_vec();
        self.select_all_in(conn, move |query| {
            by_name(query.filter(venue::Column::Id.is_in(ids)))
        })
        .await
    }

    async fn insert_genres(
        &self,
        txn: &DatabaseTransaction,
        venue_id: &Uuid,
        genres: &[String],
    ) -> DaoResult<()> {
        let genre_dao = self.genre_dao();
        for (position, name) in genres.iter().enumerate() {
            let row = venue_genre::ActiveModel {
                venue_id: Set(*venue_id),
                position: Set(position as i32),
                name: Set(name.clone()),
                ..Default::default()
            };
            genre_dao.create_in(txn, row).await?;
        }
        Ok(())
    }
}

fn by_name(query: Select<Venue>) -> Select<Venue> {
    query
        .order_by_asc(venue::Column::Name)
        .order_by_asc(venue::Column::Id)
}
