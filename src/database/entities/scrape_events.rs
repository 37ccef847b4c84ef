use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

/// Append-only log of scraping activity for a property: one row per ingested
/// batch or workflow run. Never mutated after insert.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "scrape_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub property_id: i32,
    pub competitor_id: Option<i32>,
    pub status: String, // "SUCCESS", "ERROR", "PARTIAL", "TIMEOUT"
    pub message: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub payload: Option<serde_json::Value>,
    pub source: Option<String>,
    pub received_at: ChronoDateTimeUtc,
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
}

impl Related<super::properties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Properties.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScrapeStatus {
    Success,
    Error,
    Partial,
    Timeout,
}

impl ScrapeStatus {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "SUCCESS" => Ok(ScrapeStatus::Success),
            "ERROR" => Ok(ScrapeStatus::Error),
            "PARTIAL" => Ok(ScrapeStatus::Partial),
            "TIMEOUT" => Ok(ScrapeStatus::Timeout),
            _ => Err(format!("Invalid scrape status: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScrapeStatus::Success => "SUCCESS",
            ScrapeStatus::Error => "ERROR",
            ScrapeStatus::Partial => "PARTIAL",
            ScrapeStatus::Timeout => "TIMEOUT",
        }
    }
}

impl ActiveModel {
    pub fn new(property_id: i32, status: ScrapeStatus) -> Self {
        Self {
            id: ActiveValue::NotSet,
            property_id: Set(property_id),
            competitor_id: ActiveValue::NotSet,
            status: Set(status.as_str().to_string()),
            message: ActiveValue::NotSet,
            payload: ActiveValue::NotSet,
            source: ActiveValue::NotSet,
            received_at: Set(chrono::Utc::now()),
        }
    }
}
