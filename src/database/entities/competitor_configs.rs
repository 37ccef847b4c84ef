use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

/// Per-room-type scraping configuration for a competitor. The selector
/// strings are opaque to this core: they are stored verbatim and exported to
/// the workflow engine, never interpreted here.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "competitor_configs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub competitor_id: i32,
    pub room_type_id: i32,
    pub price_selector: Option<String>,
    pub date_selector: Option<String>,
    pub currency_selector: Option<String>,
    pub availability_selector: Option<String>,
    pub notes: Option<String>,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
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

impl ActiveModel {
    pub fn new(competitor_id: i32, room_type_id: i32) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: ActiveValue::NotSet,
            competitor_id: Set(competitor_id),
            room_type_id: Set(room_type_id),
            price_selector: ActiveValue::NotSet,
            date_selector: ActiveValue::NotSet,
            currency_selector: ActiveValue::NotSet,
            availability_selector: ActiveValue::NotSet,
            notes: ActiveValue::NotSet,
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}
