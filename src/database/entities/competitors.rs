use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

/// An external venue scraped for price comparison. Scraping itself happens in
/// the external workflow engine; this row only carries identity and schedule
/// hints exported to it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "competitors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub property_id: i32,
    pub name: String,
    pub base_url: String,
    pub active: bool,
    pub frequency_cron: Option<String>,
    pub timezone: Option<String>,
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

impl Related<super::competitor_configs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompetitorConfigs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn new(property_id: i32, name: String, base_url: String) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: ActiveValue::NotSet,
            property_id: Set(property_id),
            name: Set(name),
            base_url: Set(base_url),
            active: Set(true),
            frequency_cron: ActiveValue::NotSet,
            timezone: ActiveValue::NotSet,
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}
