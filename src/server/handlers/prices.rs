use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::database::entities::scrape_events;
use crate::errors::{CoreError, CoreResult};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::auth::CurrentUser;
use crate::services::price_analysis_service::{PriceComparison, PriceQuery};
use crate::services::property_service::PruneFilter;
use crate::services::{
    AuthorizationService, IngestService, PriceAnalysisService, PropertyService,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricesQueryParams {
    pub days: Option<i64>,
    /// Room type id, or "all" for no filter
    pub room_type_id: Option<String>,
    /// Comma-separated competitor ids
    pub competitor_ids: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl PricesQueryParams {
    fn into_query(self) -> CoreResult<PriceQuery> {
        let room_type_id = match self.room_type_id.as_deref() {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(raw.parse::<i32>().map_err(|_| {
                CoreError::validation_field("roomTypeId", "roomTypeId must be a number or \"all\"")
            })?),
        };

        let competitor_ids = match self.competitor_ids.as_deref() {
            None | Some("") => Vec::new(),
            Some(raw) => raw
                .split(',')
                .map(|part| {
                    part.trim().parse::<i32>().map_err(|_| {
                        CoreError::validation_field(
                            "competitorIds",
                            "competitorIds must be a comma-separated list of numbers",
                        )
                    })
                })
                .collect::<CoreResult<Vec<i32>>>()?,
        };

        Ok(PriceQuery {
            days: self.days,
            start_date: self.start_date,
            end_date: self.end_date,
            room_type_id,
            competitor_ids,
        })
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}/prices",
    params(
        ("id" = i32, Path, description = "Property ID"),
        ("days" = Option<i64>, Query, description = "Window size in days (1-90, default 7)"),
        ("roomTypeId" = Option<String>, Query, description = "Room type filter, or \"all\""),
        ("competitorIds" = Option<String>, Query, description = "Comma-separated competitor ids"),
        ("startDate" = Option<String>, Query, description = "Explicit window start (YYYY-MM-DD)"),
        ("endDate" = Option<String>, Query, description = "Explicit window end (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Comparison statistics and chart series", body = PriceComparison),
        (status = 400, description = "Invalid filters"),
        (status = 404, description = "Property not found or access denied")
    )
)]
pub async fn get_price_comparison(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(property_id): Path<i32>,
    Query(params): Query<PricesQueryParams>,
) -> Result<Json<PriceComparison>, ApiError> {
    AuthorizationService::new(state.db.clone())
        .require_view(user.id, property_id)
        .await?;

    let query = params.into_query()?;
    let comparison = PriceAnalysisService::new(state.db.clone())
        .compute_comparison(property_id, &query)
        .await?;
    Ok(Json(comparison))
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub deleted_count: u64,
}

#[utoipa::path(
    delete,
    path = "/api/v1/properties/{id}/prices",
    params(
        ("id" = i32, Path, description = "Property ID"),
        ("competitorId" = Option<i32>, Query, description = "Only this competitor"),
        ("roomTypeId" = Option<i32>, Query, description = "Only this room type"),
        ("olderThanDays" = Option<i64>, Query, description = "Only records fetched before now minus N days")
    ),
    responses(
        (status = 200, description = "Rows removed", body = DeletedResponse),
        (status = 403, description = "Requires ADMIN role"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn prune_price_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(property_id): Path<i32>,
    Query(filter): Query<PruneFilter>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted_count = PropertyService::new(state.db.clone())
        .prune_price_history(&user, property_id, &filter)
        .await?;
    Ok(Json(DeletedResponse { deleted_count }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ScrapeEventsQuery {
    pub limit: Option<u64>,
}

pub async fn list_scrape_events(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(property_id): Path<i32>,
    Query(query): Query<ScrapeEventsQuery>,
) -> Result<Json<Vec<scrape_events::Model>>, ApiError> {
    AuthorizationService::new(state.db.clone())
        .require_view(user.id, property_id)
        .await?;

    let events = IngestService::new(state.db.clone())
        .recent_events(property_id, query.limit.unwrap_or(50))
        .await?;
    Ok(Json(events))
}
