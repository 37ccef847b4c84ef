use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::database::entities::{properties, property_access_grants};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::auth::CurrentUser;
use crate::services::authorization::PropertyOverview;
use crate::services::property_service::{
    CreatePropertyInput, GrantAccessInput, UpdatePropertyInput,
};
use crate::services::PropertyService;

#[utoipa::path(
    get,
    path = "/api/v1/properties",
    responses(
        (status = 200, description = "Properties visible to the caller", body = [PropertyOverview]),
        (status = 401, description = "No authenticated principal")
    )
)]
pub async fn list_properties(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<PropertyOverview>>, ApiError> {
    let properties = PropertyService::new(state.db.clone())
        .list_properties(&user)
        .await?;
    Ok(Json(properties))
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}",
    params(("id" = i32, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Property with aggregate counts", body = PropertyOverview),
        (status = 404, description = "Property not found or access denied")
    )
)]
pub async fn get_property(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(property_id): Path<i32>,
) -> Result<Json<PropertyOverview>, ApiError> {
    let property = PropertyService::new(state.db.clone())
        .get_property(&user, property_id)
        .await?;
    Ok(Json(property))
}

pub async fn create_property(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreatePropertyInput>,
) -> Result<Json<properties::Model>, ApiError> {
    let property = PropertyService::new(state.db.clone())
        .create_property(&user, &payload)
        .await?;
    Ok(Json(property))
}

pub async fn update_property(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(property_id): Path<i32>,
    Json(payload): Json<UpdatePropertyInput>,
) -> Result<Json<properties::Model>, ApiError> {
    let property = PropertyService::new(state.db.clone())
        .update_property(&user, property_id, &payload)
        .await?;
    Ok(Json(property))
}

pub async fn delete_property(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(property_id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    PropertyService::new(state.db.clone())
        .delete_property(&user, property_id)
        .await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferOwnershipRequest {
    pub owner_id: i32,
}

pub async fn transfer_ownership(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(property_id): Path<i32>,
    Json(payload): Json<TransferOwnershipRequest>,
) -> Result<Json<properties::Model>, ApiError> {
    let property = PropertyService::new(state.db.clone())
        .transfer_ownership(&user, property_id, payload.owner_id)
        .await?;
    Ok(Json(property))
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrantResponse {
    pub user_id: i32,
    pub property_id: i32,
    pub level: String,
}

impl From<property_access_grants::Model> for GrantResponse {
    fn from(grant: property_access_grants::Model) -> Self {
        Self {
            user_id: grant.user_id,
            property_id: grant.property_id,
            level: grant.level,
        }
    }
}

pub async fn grant_access(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(property_id): Path<i32>,
    Json(payload): Json<GrantAccessInput>,
) -> Result<Json<GrantResponse>, ApiError> {
    let grant = PropertyService::new(state.db.clone())
        .grant_access(&user, property_id, &payload)
        .await?;
    Ok(Json(grant.into()))
}

pub async fn revoke_access(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((property_id, user_id)): Path<(i32, i32)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    PropertyService::new(state.db.clone())
        .revoke_access(&user, property_id, user_id)
        .await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
