use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bourse_core::{CoreError, ValidationError};
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinError;

/// Failures surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation(error) => Self::Validation(error),
            CoreError::Store(error) => Self::StoreUnavailable(error.to_string()),
            error @ CoreError::InvalidStoredRow { .. } => Self::Internal(error.to_string()),
            CoreError::Serialization(error) => Self::Internal(error.to_string()),
        }
    }
}

impl From<JoinError> for ApiError {
    fn from(error: JoinError) -> Self {
        Self::Internal(format!("request task failed: {error}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Validation(_) | Self::BadRequest(_) => {
                tracing::debug!(error = %self, "rejected request");
            }
            Self::StoreUnavailable(_) => tracing::warn!(error = %self, "store read failed"),
            Self::Internal(_) => tracing::error!(error = %self, "request failed"),
        }

        let message = match &self {
            // Details of internal failures stay in the log.
            Self::Internal(_) => String::from("internal server error"),
            other => other.to_string(),
        };
        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
