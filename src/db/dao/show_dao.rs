use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::{ArtistDao, DaoBase, DaoLayerError, DaoResult, VenueDao};
use crate::db::entities::prelude::Show;
use crate::db::entities::show;

#[derive(Clone)]
pub struct ShowDao {
    db: DatabaseConnection,
}

impl DaoBase for ShowDao {
    type Entity = Show;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl ShowDao {
    /// Inserts a show after checking, in the same transaction, that both
    /// parents exist. Missing parents are reported together.
    pub async fn create_show(
        &self,
        artist_id: &Uuid,
        venue_id: &Uuid,
        start_time: DateTime<FixedOffset>,
    ) -> DaoResult<show::Model> {
        let txn = self.begin().await?;

        let mut missing = Vec::new();
        if !ArtistDao::new(&self.db).exists_in(&txn, *artist_id).await? {
            missing.push(("artist_id", *artist_id));
        }
        if !VenueDao::new(&self.db).exists_in(&txn, *venue_id).await? {
            missing.push(("venue_id", *venue_id));
        }
        if !missing.is_empty() {
            return Err(DaoLayerError::MissingReferences(missing));
        }

        let model = show::ActiveModel {
            artist_id: Set(*artist_id),
            venue_id: Set(*venue_id),
            start_time: Set(start_time),
            ..Default::default()
        };
        let created = self.create_in(&txn, model).await?;
        txn.commit().await.map_err(DaoLayerError::Db)?;
        Ok(created)
    }

    pub async fn list_for_venue_in<C>(&self, conn: &C, venue_id: &Uuid) -> DaoResult<Vec<show::Model>>
    where
        C: ConnectionTrait + Sync,
    {
        let venue_id = *venue_id;
        self.select_all_in(conn, move |query| {
            by_start_time(query.filter(show::Column::VenueId.eq(venue_id)))
        })
        .await
    }

    pub async fn list_for_artist_in<C>(
        &self,
        conn: &C,
        artist_id: &Uuid,
    ) -> DaoResult<Vec<show::Model>>
    where
        C: ConnectionTrait + Sync,
    {
        let artist_id = *artist_id;
        self.select_all_in(conn, move |query| {
            by_start_time(query.filter(show::Column::ArtistId.eq(artist_id)))
        })
        .await
    }

    pub async fn list_shows_in<C>(&self, conn: &C) -> DaoResult<Vec<show::Model>>
    where
        C: ConnectionTrait + Sync,
    {
        self.select_all_in(conn, by_start_time).await
    }

    /// Upcoming shows per venue. `only` narrows the count to those venues;
    /// an empty slice answers without touching the database.
    pub async fn count_upcoming_by_venue(
        &self,
        now: DateTime<FixedOffset>,
        only: Option<&[Uuid]>,
    ) -> DaoResult<HashMap<Uuid, usize>> {
        self.count_upcoming_by(show::Column::VenueId, now, only).await
    }

    pub async fn count_upcoming_by_artist(
        &self,
        now: DateTime<FixedOffset>,
        only: Option<&[Uuid]>,
    ) -> DaoResult<HashMap<Uuid, usize>> {
        self.count_upcoming_by(show::Column::ArtistId, now, only).await
    }

    async fn count_upcoming_by(
        &self,
        parent: show::Column,
        now: DateTime<FixedOffset>,
        only: Option<&[Uuid]>,
    ) -> DaoResult<HashMap<Uuid, usize>> {
        let mut query = Show::find()
            .select_only()
            .column_as(parent, "parent_id")
            .column_as(Expr::from(Func::count(show::Column::Id.into_expr())), "upcoming")
            .filter(show::Column::StartTime.gt(now))
            .group_by(parent);
        if let Some(ids) = only {
            if ids.is_empty() {
                return Ok(HashMap::new());
            }
            query = query.filter(parent.is_in(ids.iter().copied()));
        }

        let rows = query
            .into_model::<UpcomingCount>()
            .all(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(rows
            .into_iter()
            .map(|row| (row.parent_id, usize::try_from(row.upcoming).unwrap_or_default()))
            .collect())
    }
}

#[derive(Debug, FromQueryResult)]
struct UpcomingCount {
    parent_id: Uuid,
    upcoming: i64,
}

fn by_start_time(query: Select<Show>) -> Select<Show> {
    query
        .order_by_asc(show::Column::StartTime)
        .order_by_asc(show::Column::Id)
}
