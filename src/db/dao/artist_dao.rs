use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Select, Set,
};
use uuid::Uuid;

use super::search::name_contains;
use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::prelude::{Artist, ArtistGenre, Show};
use crate::db::entities::{artist, artist_genre, show};

#[derive(Clone)]
pub struct ArtistDao {
    db: DatabaseConnection,
}

impl DaoBase for ArtistDao {
    type Entity = Artist;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Clone)]
struct ArtistGenreDao {
    db: DatabaseConnection,
}

impl DaoBase for ArtistGenreDao {
    type Entity = ArtistGenre;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistWithGenres {
    pub artist: artist::Model,
    pub genres: Vec<String>,
}

impl ArtistDao {
    fn genre_dao(&self) -> ArtistGenreDao {
        ArtistGenreDao::new(&self.db)
    }

    pub async fn create_artist(
        &self,
        data: artist::ActiveModel,
        genres: &[String],
    ) -> DaoResult<ArtistWithGenres> {
        let txn = self.begin().await?;
        let artist = self.create_in(&txn, data).await?;
        self.insert_genres(&txn, &artist.id, genres).await?;
        txn.commit().await.map_err(DaoLayerError::Db)?;
        Ok(ArtistWithGenres {
            artist,
            genres: genres.to_vec(),
        })
    }

    /// Overwrites the artist columns set by `apply` and replaces its genre list.
    pub async fn update_artist<F>(
        &self,
        id: &Uuid,
        genres: &[String],
        apply: F,
    ) -> DaoResult<ArtistWithGenres>
    where
        F: for<'a> FnOnce(&'a mut artist::ActiveModel) + Send,
    {
        let txn = self.begin().await?;
        let artist = self.update_in(&txn, *id, apply).await?;
        ArtistGenre::delete_many()
            .filter(artist_genre::Column::ArtistId.eq(*id))
            .exec(&txn)
            .await
            .map_err(DaoLayerError::Db)?;
        self.insert_genres(&txn, id, genres).await?;
        txn.commit().await.map_err(DaoLayerError::Db)?;
        Ok(ArtistWithGenres {
            artist,
            genres: genres.to_vec(),
        })
    }

    /// Deletes the artist with its shows and genres. Returns the number of
    /// shows removed.
    pub async fn delete_artist(&self, id: &Uuid) -> DaoResult<u64> {
        let txn = self.begin().await?;
        let removed_shows = Show::delete_many()
            .filter(show::Column::ArtistId.eq(*id))
            .exec(&txn)
            .await
            .map_err(DaoLayerError::Db)?
            .rows_affected;
        ArtistGenre::delete_many()
            .filter(artist_genre::Column::ArtistId.eq(*id))
            .exec(&txn)
            .await
            .map_err(DaoLayerError::Db)?;
        self.delete_in(&txn, *id).await?;
        txn.commit().await.map_err(DaoLayerError::Db)?;
        Ok(removed_shows)
    }

    pub async fn find_with_genres(&self, id: &Uuid) -> DaoResult<ArtistWithGenres> {
        self.find_with_genres_in(&self.db, id).await
    }

    pub async fn find_with_genres_in<C>(
        &self,
        conn: &C,
        id: &Uuid,
    ) -> DaoResult<ArtistWithGenres>
    where
        C: ConnectionTrait + Sync,
    {
        let artist = self.find_by_id_in(conn, *id).await?;
        let id = *id;
        let genres = self
            .genre_dao()
            .select_all_in(conn, move |query| {
                query
                    .filter(artist_genre::Column::ArtistId.eq(id))
                    .order_by_asc(artist_genre::Column::Position)
                    .order_by_asc(artist_genre::Column::Id)
            })
            .await?
            .into_iter()
            .map(|row| row.name)
            .collect();
        Ok(ArtistWithGenres { artist, genres })
    }

    pub async fn list_artists(&self) -> DaoResult<Vec<artist::Model>> {
        self.select_all_in(&self.db, by_name).await
    }

    /// Most recently created artists first.
    pub async fn latest_artists(&self, limit: u64) -> DaoResult<Vec<artist::Model>> {
        self.find(1, limit, None, |query| query)
            .await
            .map(|response| response.data)
    }

    pub async fn search_by_name(&self, term: &str) -> DaoResult<Vec<artist::Model>> {
        let condition = name_contains(artist::Column::SearchName, term);
        self.select_all_in(&self.db, move |query| by_name(query.filter(condition)))
            .await
    }

    pub async fn find_many_in<C>(&self, conn: &C, ids: &[Uuid]) -> DaoResult<Vec<artist::Model>>
    where
        C: ConnectionTrait + Sync,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = ids.to_vec();
        self.select_all_in(conn, move |query| {
            by_name(query.filter(artist::Column::Id.is_in(ids)))
        })
        .await
    }

    async fn insert_genres(
        &self,
        txn: &DatabaseTransaction,
        artist_id: &Uuid,
        genres: &[String],
    ) -> DaoResult<()> {
        let genre_dao = self.genre_dao();
        for (position, name) in genres.iter().enumerate() {
            let row = artist_genre::ActiveModel {
                artist_id: Set(*artist_id),
                position: Set(position as i32),
                name: Set(name.clone()),
                ..Default::default()
            };
            genre_dao.create_in(txn, row).await?;
        }
        Ok(())
    }
}

fn by_name(query: Select<Artist>) -> Select<Artist> {
    query
        .order_by_asc(artist::Column::Name)
        .order_by_asc(artist::Column::Id)
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use crate::db::entities::{artist, artist_genre};

    use super::ArtistDao;
    use crate::db::dao::{DaoBase, DaoLayerError};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn artist_model(id: Uuid, name: &str) -> artist::Model {
        let now = ts();
        artist::Model {
            id,
            created_at: now,
            updated_at: now,
            name: name.to_string(),
            search_name: name.to_lowercase(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: Some("326-123-5000".to_string()),
            image_link: None,
            facebook_link: None,
            website_link: None,
            seeking_venue: true,
            seeking_description: Some("Looking for shows in the Bay Area".to_string()),
        }
    }

    #[tokio::test]
    async fn find_with_genres_keeps_names_with_commas() {
        let id = Uuid::new_v4();
        let now = ts();
        let genre = artist_genre::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            artist_id: id,
            position: 0,
            name: "Rock, Roll".to_string(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[artist_model(id, "Guns N Petals")]])
            .append_query_results([[genre]])
            .into_connection();
        let dao = ArtistDao::new(&db);

        let found = dao
            .find_with_genres(&id)
            .await
            .expect("query should succeed");
        assert_eq!(found.artist.name, "Guns N Petals");
        assert_eq!(found.genres, vec!["Rock, Roll".to_string()]);
    }

    #[tokio::test]
    async fn search_by_name_is_one_query_on_the_folded_column() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[artist_model(Uuid::from_u128(1), "Édith Piaf")]])
            .into_connection();
        let dao = ArtistDao::new(&db);

        let found = dao.search_by_name("ÉDITH").await.expect("query should succeed");
        assert_eq!(found.len(), 1);

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let statement = &log[0].statements()[0];
        assert!(statement.sql.contains(r#""artists"."search_name" LIKE"#));
        assert!(
            statement
                .sql
                .ends_with(r#"ORDER BY "artists"."name" ASC, "artists"."id" ASC"#)
        );
        assert!(format!("{:?}", statement.values).contains("%édith%"));
    }

    #[tokio::test]
    async fn delete_artist_reports_missing_artist() {
        let missing = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let dao = ArtistDao::new(&db);

        let err = dao
            .delete_artist(&missing)
            .await
            .expect_err("delete should fail");
        assert!(matches!(err, DaoLayerError::NotFound { id, .. } if id == missing));
    }
}
