use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::features::reports::models::{SubmissionError, SubmissionFailureKind};
use crate::shared::types::ErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            AppError::MethodNotAllowed(msg) => {
                (StatusCode::METHOD_NOT_ALLOWED, ErrorResponse::new(msg))
            }
            AppError::Submission(e) => {
                let assigned_folio = e.assigned_folio().map(|f| f.to_string());
                let error = match e.kind() {
                    SubmissionFailureKind::Allocation => {
                        tracing::error!("Folio allocation failed: {}", e);
                        "Failed to calculate the next folio."
                    }
                    SubmissionFailureKind::RecordPersist => {
                        tracing::error!(
                            "Report commit failed, folio {} left unused: {}",
                            assigned_folio.as_deref().unwrap_or("-"),
                            e
                        );
                        "Failed to commit the report to the repository."
                    }
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(error)
                        .with_details(e.details())
                        .with_assigned_folio(assigned_folio),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error").with_details(msg),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
