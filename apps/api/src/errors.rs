use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::interview::state_machine::InterviewError;
use crate::interview::store::SessionLimitReached;
use crate::loader::LoadError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Interview {0} is already complete")]
    InterviewComplete(Uuid),

    #[error(transparent)]
    SessionLimit(#[from] SessionLimitReached),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn session_not_found(id: Uuid) -> Self {
        AppError::NotFound(format!("Interview session {id} not found"))
    }

    pub fn from_interview(id: Uuid, err: InterviewError) -> Self {
        match err {
            InterviewError::AlreadyComplete => AppError::InterviewComplete(id),
        }
    }
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Json(_) | LoadError::Encoding | LoadError::Pdf(_) => {
                AppError::UnprocessableEntity(err.to_string())
            }
            LoadError::Io { .. } | LoadError::Task(_) => AppError::Internal(err.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::InterviewComplete(_) => (
                StatusCode::CONFLICT,
                "INTERVIEW_COMPLETE",
                self.to_string(),
            ),
            AppError::SessionLimit(e) => {
                tracing::warn!("Session limit reached: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SESSION_LIMIT",
                    "Too many interviews in progress, try again later".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
