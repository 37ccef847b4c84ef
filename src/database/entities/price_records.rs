use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One observed price fact: what a competitor charged for a room type on a
/// stay date, as seen at `fetched_at`. Immutable once written; re-scrapes of
/// the same (property, competitor, room type, stay date, source) tuple are
/// skipped by the unique index rather than merged.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "price_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub property_id: i32,
    pub competitor_id: i32,
    pub room_type_id: i32,
    pub target_date: ChronoDate, // the stay date being priced, may be in the future
    pub price: f64,
    pub currency: String,
    pub available: bool,
    pub fetched_at: ChronoDateTimeUtc,
    pub source: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::properties::Entity",
        from = "Column::PropertyId",
        to = "super::properties::Column::Id"
    )]
    Properties,
    #[sea_orm(
        belongs_to = "super::competitors::Entity",
        from = "Column::CompetitorId",
        to = "super::competitors::Column::Id"
    )]
    Competitors,
    #[sea_orm(
        belongs_to = "super::room_types::Entity",
        from = "Column::RoomTypeId",
        to = "super::room_types::Column::Id"
    )]
    RoomTypes,
}

impl Related<super::properties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Properties.def()
    }
}

impl Related<super::competitors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Competitors.def()
    }
}

impl Related<super::room_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoomTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
