use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::backend::ApiError;
use crate::services::intake::{FieldInputError, SubmitError, NOT_LOGGED_IN, SUBMISSION_FAILED};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    BadInput(String),

    #[error("validation failed")]
    Validation(serde_json::Value),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Upstream(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadInput(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };

        let body = match &self {
            AppError::Validation(fields) => {
                serde_json::json!({ "error": self.to_string(), "fields": fields })
            }
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::NotAuthenticated => AppError::Unauthorized(NOT_LOGGED_IN.to_string()),
            SubmitError::Invalid(errors) => {
                AppError::Validation(serde_json::to_value(errors).unwrap_or_default())
            }
            SubmitError::InFlight | SubmitError::Cancelled => AppError::Conflict(err.to_string()),
            // The cause is already logged; users only see the generic banner.
            SubmitError::Remote(_) => AppError::Upstream(SUBMISSION_FAILED.to_string()),
        }
    }
}

impl From<FieldInputError> for AppError {
    fn from(err: FieldInputError) -> Self {
        AppError::BadInput(err.to_string())
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotAuthenticated | ApiError::Unauthorized => {
                AppError::Unauthorized("not authenticated".to_string())
            }
            other => {
                tracing::error!(error = %other, "content API call failed");
                AppError::Upstream("content service unavailable".to_string())
            }
        }
    }
}
