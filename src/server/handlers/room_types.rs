use axum::extract::{Path, State};
use axum::Json;

use crate::database::entities::room_types;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::auth::CurrentUser;
use crate::services::property_service::CreateRoomTypeInput;
use crate::services::PropertyService;

pub async fn list_room_types(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(property_id): Path<i32>,
) -> Result<Json<Vec<room_types::Model>>, ApiError> {
    let room_types = PropertyService::new(state.db.clone())
        .list_room_types(&user, property_id)
        .await?;
    Ok(Json(room_types))
}

pub async fn create_room_type(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(property_id): Path<i32>,
    Json(payload): Json<CreateRoomTypeInput>,
) -> Result<Json<room_types::Model>, ApiError> {
    let room_type = PropertyService::new(state.db.clone())
        .create_room_type(&user, property_id, &payload)
        .await?;
    Ok(Json(room_type))
}

pub async fn delete_room_type(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(room_type_id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    PropertyService::new(state.db.clone())
        .delete_room_type(&user, room_type_id)
        .await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
