use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

/// A monitored hospitality venue. Every property has exactly one owning user
/// at all times; dependents (room types, competitors, price records, access
/// grants) are removed by FK cascade when the property is deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub property_type: String, // "hotel", "b&b", "apartment", ...
    pub owner_id: i32,
    pub timezone: String, // IANA name, e.g. "Europe/Rome"
    pub default_frequency_cron: String,
    pub default_lookahead_days: i32,
    pub branding_logo_url: Option<String>,
    pub branding_primary_color: Option<String>,
    pub branding_accent_color: Option<String>,
    pub theme: Option<String>,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::room_types::Entity")]
    RoomTypes,
    #[sea_orm(has_many = "super::competitors::Entity")]
    Competitors,
    #[sea_orm(has_many = "super::price_records::Entity")]
    PriceRecords,
    #[sea_orm(has_many = "super::property_access_grants::Entity")]
    PropertyAccessGrants,
    #[sea_orm(has_many = "super::scrape_events::Entity")]
    ScrapeEvents,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::room_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoomTypes.def()
    }
}

impl Related<super::competitors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Competitors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        Self {
            id: ActiveValue::NotSet,
            name: ActiveValue::NotSet,
            city: ActiveValue::NotSet,
            country: ActiveValue::NotSet,
            address: ActiveValue::NotSet,
            property_type: Set("hotel".to_string()),
            owner_id: ActiveValue::NotSet,
            timezone: Set("UTC".to_string()),
            default_frequency_cron: Set("0 */2 * * *".to_string()),
            default_lookahead_days: Set(30),
            branding_logo_url: ActiveValue::NotSet,
            branding_primary_color: ActiveValue::NotSet,
            branding_accent_color: ActiveValue::NotSet,
            theme: ActiveValue::NotSet,
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    pub fn set_updated_at(mut self) -> Self {
        self.updated_at = Set(chrono::Utc::now());
        self
    }
}
