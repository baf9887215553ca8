//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use azy_core::PipelineError;
use thiserror::Error;
use tracing::{error, warn};

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client-caused pipeline failure (validation, policy, unknown action).
    #[error("{0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Body extraction refused by the transport layer (e.g. too large).
    #[error("{1}")]
    Rejected(StatusCode, String),

    #[error("{message}")]
    Upstream { message: String, details: String },

    #[error("Erro interno no servidor")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, ErrorResponse::new(m)),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorResponse::new("Method not allowed"),
            ),
            AppError::Rejected(status, m) => (status, ErrorResponse::new(m)),
            AppError::Upstream { message, details } => {
                warn!(%details, "upstream failure surfaced to caller");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        details: Some(details),
                        ..ErrorResponse::new(message)
                    },
                )
            }
            AppError::Internal(detail) => {
                error!(%detail, "internal fault");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        detail: Some(detail),
                        ..ErrorResponse::new("Erro interno no servidor")
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        let message = e.to_string();
        if e.is_client_error() {
            return AppError::BadRequest(message);
        }
        match e {
            PipelineError::UpstreamFailure { detail, .. } => AppError::Upstream {
                message,
                details: detail,
            },
            PipelineError::Internal(detail) => AppError::Internal(detail),
            other => AppError::Internal(format!("unclassified pipeline error: {other:?}")),
        }
    }
}
