use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::database::entities::scrape_events::ScrapeStatus;
use crate::database::entities::{
    competitor_configs, competitors, price_records, properties, room_types, scrape_events,
};
use crate::errors::{CoreError, CoreResult};
use crate::services::ValidationService;

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_available() -> bool {
    true
}

fn default_source() -> String {
    "webhook".to_string()
}

/// One scraped price as pushed by the workflow engine.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    /// Stay date, RFC 3339 or YYYY-MM-DD; truncated to its calendar date
    pub target_date: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

/// A webhook batch: prices for one (property, competitor, room type) tuple.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceBatch {
    pub property_id: i32,
    pub competitor_id: i32,
    pub room_type_id: i32,
    pub prices: Vec<PricePoint>,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    pub prices_received: u64,
    pub prices_saved: u64,
    pub duplicates_skipped: u64,
}

/// Workflow execution summary pushed by the scraping engine after a run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRunLog {
    pub property_id: i32,
    #[serde(default)]
    pub competitor_id: Option<i32>,
    /// "SUCCESS", "ERROR", "PARTIAL" or "TIMEOUT"
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Option<serde_json::Value>,
}

/// A property with its active room types, competitors and scraping configs,
/// exported so the workflow engine can plan its runs.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeTarget {
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub property: properties::Model,
    #[schema(value_type = Vec<Object>)]
    pub room_types: Vec<room_types::Model>,
    pub competitors: Vec<ScrapeTargetCompetitor>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeTargetCompetitor {
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub competitor: competitors::Model,
    #[schema(value_type = Vec<Object>)]
    pub configs: Vec<competitor_configs::Model>,
}

/// Validates and persists price batches pushed by the external scraping
/// workflow, and keeps the append-only scrape-event trail.
///
/// Ingestion never re-reads global state for its summary: the counts cover
/// only the batch at hand, so concurrent batches need no mutual exclusion.
#[derive(Clone)]
pub struct IngestService {
    db: DatabaseConnection,
}

impl IngestService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn ingest_price_batch(&self, batch: &PriceBatch) -> CoreResult<IngestSummary> {
        // Validate the payload before touching the store
        let mut parsed: Vec<(NaiveDate, &PricePoint)> = Vec::with_capacity(batch.prices.len());
        for point in &batch.prices {
            if !point.price.is_finite() || point.price < 0.0 {
                return Err(CoreError::validation_field(
                    "price",
                    "Price must be a non-negative number",
                ));
            }
            ValidationService::validate_currency(&point.currency)?;
            parsed.push((parse_target_date(&point.target_date)?, point));
        }

        // All-or-nothing existence check on the referenced entities
        let _property = properties::Entity::find_by_id(batch.property_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::reference_not_found("property", batch.property_id))?;

        let competitor = competitors::Entity::find_by_id(batch.competitor_id)
            .one(&self.db)
            .await?
            .filter(|c| c.property_id == batch.property_id)
            .ok_or_else(|| CoreError::reference_not_found("competitor", batch.competitor_id))?;

        let _room_type = room_types::Entity::find_by_id(batch.room_type_id)
            .one(&self.db)
            .await?
            .filter(|rt| rt.property_id == batch.property_id)
            .ok_or_else(|| CoreError::reference_not_found("room type", batch.room_type_id))?;

        // Correlation tag linking this batch to its scrape-event trail
        let correlation_id = uuid::Uuid::new_v4().to_string();
        let fetched_at = Utc::now();
        let mut saved: u64 = 0;
        let mut duplicates: u64 = 0;

        for (target_date, point) in parsed {
            let record = price_records::ActiveModel {
                id: ActiveValue::NotSet,
                property_id: Set(batch.property_id),
                competitor_id: Set(batch.competitor_id),
                room_type_id: Set(batch.room_type_id),
                target_date: Set(target_date),
                price: Set(point.price),
                currency: Set(point.currency.to_ascii_uppercase()),
                available: Set(point.available),
                fetched_at: Set(fetched_at),
                source: Set(batch.source.clone()),
                metadata: Set(batch.metadata.clone()),
            };

            let insert = price_records::Entity::insert(record)
                .on_conflict(
                    OnConflict::columns([
                        price_records::Column::PropertyId,
                        price_records::Column::CompetitorId,
                        price_records::Column::RoomTypeId,
                        price_records::Column::TargetDate,
                        price_records::Column::Source,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec(&self.db)
                .await;

            match insert {
                Ok(_) => saved += 1,
                // Re-scrape of an already known tuple: skipped, not an error
                Err(DbErr::RecordNotInserted) => duplicates += 1,
                Err(err) => {
                    self.append_event(
                        batch.property_id,
                        Some(competitor.id),
                        ScrapeStatus::Error,
                        Some(err.to_string()),
                        Some(serde_json::json!({
                            "correlationId": correlation_id,
                            "batch": batch,
                        })),
                        Some(batch.source.clone()),
                    )
                    .await;
                    return Err(err.into());
                }
            }
        }

        let summary = IngestSummary {
            prices_received: batch.prices.len() as u64,
            prices_saved: saved,
            duplicates_skipped: duplicates,
        };

        self.append_event(
            batch.property_id,
            Some(competitor.id),
            ScrapeStatus::Success,
            Some(format!(
                "Stored {} prices ({} duplicates skipped)",
                saved, duplicates
            )),
            Some(serde_json::json!({
                "correlationId": correlation_id,
                "statistics": summary,
            })),
            Some(batch.source.clone()),
        )
        .await;

        tracing::info!(
            correlation_id,
            property_id = batch.property_id,
            competitor_id = batch.competitor_id,
            received = summary.prices_received,
            saved = summary.prices_saved,
            duplicates = summary.duplicates_skipped,
            "ingested price batch"
        );

        Ok(summary)
    }

    /// Record a workflow execution summary as a scrape event. Unlike the
    /// batch-side event trail this append is the whole point of the call, so
    /// failures propagate.
    pub async fn record_workflow_run(&self, run: &WorkflowRunLog) -> CoreResult<scrape_events::Model> {
        let status = ScrapeStatus::from_str(&run.status)
            .map_err(|_| CoreError::validation_field("status", "Invalid scrape status"))?;

        properties::Entity::find_by_id(run.property_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::reference_not_found("property", run.property_id))?;

        if let Some(competitor_id) = run.competitor_id {
            competitors::Entity::find_by_id(competitor_id)
                .one(&self.db)
                .await?
                .filter(|c| c.property_id == run.property_id)
                .ok_or_else(|| CoreError::reference_not_found("competitor", competitor_id))?;
        }

        let mut event = scrape_events::ActiveModel::new(run.property_id, status);
        event.competitor_id = Set(run.competitor_id);
        event.message = Set(run.message.clone());
        event.payload = Set(run.metadata.clone());
        event.source = Set(Some(run.source.clone()));

        Ok(event.insert(&self.db).await?)
    }

    /// Newest scrape events for a property, for the health view.
    pub async fn recent_events(
        &self,
        property_id: i32,
        limit: u64,
    ) -> CoreResult<Vec<scrape_events::Model>> {
        let events = scrape_events::Entity::find()
            .filter(scrape_events::Column::PropertyId.eq(property_id))
            .order_by_desc(scrape_events::Column::ReceivedAt)
            .limit(limit.clamp(1, 200))
            .all(&self.db)
            .await?;
        Ok(events)
    }

    /// Export every property that has at least one active competitor,
    /// together with active room types and per-competitor selector configs.
    /// The workflow engine polls this to plan its scraping runs.
    pub async fn active_scrape_targets(&self) -> CoreResult<Vec<ScrapeTarget>> {
        let all_properties = properties::Entity::find()
            .order_by_desc(properties::Column::UpdatedAt)
            .all(&self.db)
            .await?;

        let mut targets = Vec::new();
        for property in all_properties {
            let active_competitors = competitors::Entity::find()
                .filter(competitors::Column::PropertyId.eq(property.id))
                .filter(competitors::Column::Active.eq(true))
                .all(&self.db)
                .await?;
            if active_competitors.is_empty() {
                continue;
            }

            let active_room_types = room_types::Entity::find()
                .filter(room_types::Column::PropertyId.eq(property.id))
                .filter(room_types::Column::Active.eq(true))
                .all(&self.db)
                .await?;

            let mut with_configs = Vec::with_capacity(active_competitors.len());
            for competitor in active_competitors {
                let configs = competitor_configs::Entity::find()
                    .filter(competitor_configs::Column::CompetitorId.eq(competitor.id))
                    .all(&self.db)
                    .await?;
                with_configs.push(ScrapeTargetCompetitor { competitor, configs });
            }

            targets.push(ScrapeTarget {
                property,
                room_types: active_room_types,
                competitors: with_configs,
            });
        }

        Ok(targets)
    }

    /// Best-effort scrape-event append: a failed write is logged, never
    /// allowed to fail the ingest it describes.
    async fn append_event(
        &self,
        property_id: i32,
        competitor_id: Option<i32>,
        status: ScrapeStatus,
        message: Option<String>,
        payload: Option<serde_json::Value>,
        source: Option<String>,
    ) {
        let mut event = scrape_events::ActiveModel::new(property_id, status);
        event.competitor_id = Set(competitor_id);
        event.message = Set(message);
        event.payload = Set(payload);
        event.source = Set(source);

        if let Err(err) = event.insert(&self.db).await {
            tracing::warn!(property_id, error = %err, "failed to record scrape event");
        }
    }
}

/// Accepts a full RFC 3339 timestamp or a bare calendar date; either way the
/// stay date is the calendar date.
fn parse_target_date(raw: &str) -> CoreResult<NaiveDate> {
    if let Ok(date) = raw.parse::<NaiveDate>() {
        return Ok(date);
    }
    if let Ok(datetime) = raw.parse::<DateTime<Utc>>() {
        return Ok(datetime.date_naive());
    }

    Err(CoreError::validation_field(
        "targetDate",
        format!("Invalid target date: {}", raw),
    ))
}
