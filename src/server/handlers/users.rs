use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::auth::CurrentUser;
use crate::services::auth_service::{SignupInput, UserResponse};
use crate::services::AuthService;

#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupInput,
    responses(
        (status = 200, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupInput>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = AuthService::new(state.db.clone()).signup(&payload).await?;
    Ok(Json(user.into()))
}

pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = AuthService::new(state.db.clone()).list_users(&user).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetRoleRequest {
    pub role: String,
}

pub async fn set_user_role(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(user_id): Path<i32>,
    Json(payload): Json<SetRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let updated = AuthService::new(state.db.clone())
        .set_user_role(&actor, user_id, &payload.role)
        .await?;
    Ok(Json(updated.into()))
}
