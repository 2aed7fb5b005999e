//! Hooks `#[record_entity]` implements for every Fyyur table, so `DaoBase`
//! can stamp ids and timestamps without knowing the concrete entity.

use sea_orm::entity::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

pub trait RecordColumns: sea_orm::EntityTrait {
    /// Default sort key for "latest" listings.
    fn created_at_column() -> Self::Column;
}

pub trait RecordActiveModel {
    /// Fresh id with both timestamps set to `now`.
    fn stamp_new(&mut self, id: Uuid, now: DateTimeWithTimeZone);

    fn touch(&mut self, now: DateTimeWithTimeZone);
}
