use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::auth::WebhookAuth;
use crate::services::ingest_service::{IngestSummary, PriceBatch, ScrapeTarget, WorkflowRunLog};
use crate::services::IngestService;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub success: bool,
    pub statistics: IngestSummary,
}

#[utoipa::path(
    post,
    path = "/webhook/price-ingest",
    request_body = PriceBatch,
    responses(
        (status = 200, description = "Batch stored", body = IngestResponse),
        (status = 400, description = "Invalid payload or unknown references"),
        (status = 401, description = "Invalid API key")
    )
)]
pub async fn ingest_prices(
    State(state): State<AppState>,
    _auth: WebhookAuth,
    Json(batch): Json<PriceBatch>,
) -> Result<Json<IngestResponse>, ApiError> {
    let statistics = IngestService::new(state.db.clone())
        .ingest_price_batch(&batch)
        .await?;
    Ok(Json(IngestResponse {
        success: true,
        statistics,
    }))
}

pub async fn log_scrape_run(
    State(state): State<AppState>,
    _auth: WebhookAuth,
    Json(run): Json<WorkflowRunLog>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let event = IngestService::new(state.db.clone())
        .record_workflow_run(&run)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "eventId": event.id })))
}

pub async fn active_properties(
    State(state): State<AppState>,
    _auth: WebhookAuth,
) -> Result<Json<Vec<ScrapeTarget>>, ApiError> {
    let targets = IngestService::new(state.db.clone())
        .active_scrape_targets()
        .await?;
    Ok(Json(targets))
}
