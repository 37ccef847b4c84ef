use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::errors::{CoreError, CoreErrorKind};

/// Axum-facing wrapper around [`CoreError`]: maps error kinds to HTTP
/// statuses and renders a JSON body. Internal errors are logged with full
/// context and served with a generic message.
#[derive(Debug)]
pub struct ApiError(CoreError);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, String>>,
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind() {
            CoreErrorKind::NotFound => StatusCode::NOT_FOUND,
            CoreErrorKind::Validation => StatusCode::BAD_REQUEST,
            CoreErrorKind::Conflict => StatusCode::CONFLICT,
            CoreErrorKind::Forbidden => StatusCode::FORBIDDEN,
            CoreErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            CoreErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?self.0, "internal server error");
            ErrorBody {
                error: "Internal server error".to_string(),
                fields: None,
            }
        } else {
            ErrorBody {
                error: self.0.message().to_string(),
                fields: self.0.fields().cloned(),
            }
        };

        (status, Json(body)).into_response()
    }
}
