use axum::extract::{Path, State};
use axum::Json;

use crate::database::entities::{competitor_configs, competitors};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::auth::CurrentUser;
use crate::services::property_service::{CompetitorConfigInput, CreateCompetitorInput};
use crate::services::PropertyService;

pub async fn list_competitors(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(property_id): Path<i32>,
) -> Result<Json<Vec<competitors::Model>>, ApiError> {
    let competitors = PropertyService::new(state.db.clone())
        .list_competitors(&user, property_id)
        .await?;
    Ok(Json(competitors))
}

pub async fn create_competitor(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(property_id): Path<i32>,
    Json(payload): Json<CreateCompetitorInput>,
) -> Result<Json<competitors::Model>, ApiError> {
    let competitor = PropertyService::new(state.db.clone())
        .create_competitor(&user, property_id, &payload)
        .await?;
    Ok(Json(competitor))
}

pub async fn delete_competitor(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(competitor_id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    PropertyService::new(state.db.clone())
        .delete_competitor(&user, competitor_id)
        .await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

pub async fn upsert_config(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(competitor_id): Path<i32>,
    Json(payload): Json<CompetitorConfigInput>,
) -> Result<Json<competitor_configs::Model>, ApiError> {
    let config = PropertyService::new(state.db.clone())
        .upsert_competitor_config(&user, competitor_id, &payload)
        .await?;
    Ok(Json(config))
}
