use fyyur_entity_derive::record_entity;
use sea_orm::entity::prelude::*;

#[record_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "venues")]
pub struct Model {
    #[sea_orm(indexed)]
    pub name: String,
    /// `name` case-folded on write; searches match against this column.
    #[serde(skip)]
    #[sea_orm(indexed)]
    pub search_name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    #[sea_orm(default_value = false)]
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    #[sea_orm(has_many)]
    pub shows: HasMany<super::show::Entity>,
    #[sea_orm(has_many)]
    pub genres: HasMany<super::venue_genre::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
