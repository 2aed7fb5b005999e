use fyyur_entity_derive::record_entity;
use sea_orm::entity::prelude::*;

/// One entry of an artist's ordered genre list.
#[record_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "artist_genres")]
pub struct Model {
    #[sea_orm(indexed)]
    pub artist_id: Uuid,
    pub position: i32,
    pub name: String,
    #[sea_orm(belongs_to, from = "artist_id", to = "id", on_delete = "Cascade")]
    pub artist: HasOne<super::artist::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
