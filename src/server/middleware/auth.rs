use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use sea_orm::EntityTrait;

use crate::database::entities::users;
use crate::errors::CoreError;
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// The authenticated dashboard principal.
///
/// Credential verification and session issuance live in the upstream
/// authentication gateway, which injects the resolved user id as the
/// `x-user-id` header. This extractor loads the user row and rejects
/// missing, unknown, or deactivated principals.
pub struct CurrentUser(pub users::Model);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| CoreError::unauthorized("Authentication required"))?;

        let user_id: i32 = raw
            .parse()
            .map_err(|_| CoreError::unauthorized("Invalid principal header"))?;

        let user = users::Entity::find_by_id(user_id)
            .one(&state.db)
            .await
            .map_err(CoreError::from)?
            .ok_or_else(|| CoreError::unauthorized("Unknown principal"))?;

        if !user.is_active {
            return Err(CoreError::forbidden("Account is deactivated").into());
        }

        Ok(CurrentUser(user))
    }
}

/// Bearer API-key check for the workflow-facing webhook routes, plus the
/// optional shared-secret header. No detail beyond "invalid" is leaked.
pub struct WebhookAuth;

#[async_trait]
impl FromRequestParts<AppState> for WebhookAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| CoreError::unauthorized("Invalid API key"))?;

        if token != state.config.webhook_token {
            return Err(CoreError::unauthorized("Invalid API key").into());
        }

        if let Some(secret) = &state.config.webhook_secret {
            let provided = parts
                .headers
                .get("x-webhook-secret")
                .and_then(|value| value.to_str().ok());
            if provided != Some(secret.as_str()) {
                return Err(CoreError::unauthorized("Invalid webhook secret").into());
            }
        }

        Ok(WebhookAuth)
    }
}
