use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "room_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub property_id: i32,
    pub name: String,
    pub code: Option<String>, // short code like "DBL"
    pub capacity: i32,
    pub active: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::properties::Entity",
        from = "Column::PropertyId",
        to = "super::properties::Column::Id"
    )]
    Properties,
    #[sea_orm(has_many = "super::competitor_configs::Entity")]
    CompetitorConfigs,
    #[sea_orm(has_many = "super::price_records::Entity")]
    PriceRecords,
}

impl Related<super::properties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Properties.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn new(property_id: i32, name: String) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: ActiveValue::NotSet,
            property_id: Set(property_id),
            name: Set(name),
            code: ActiveValue::NotSet,
            capacity: Set(2),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}
