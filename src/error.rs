//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Pricing(e) => match e {
                PricingError::PackageNotFound { .. } | PricingError::AgentNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                PricingError::DataIntegrityViolation { .. }
                | PricingError::OverlappingSeasonalRate { .. } => StatusCode::CONFLICT,
                PricingError::InvalidSeasonalRate { .. } | PricingError::InvalidInput { .. } => {
                    StatusCode::BAD_REQUEST
                }
                PricingError::ConfigurationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::NotFound => PricingErrorResponse {
                error_type: "not_found".to_string(),
                message: self.to_string(),
                details: None,
            },
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                PricingErrorResponse {
                    error_type: "database_error".to_string(),
                    message: "Database error".to_string(),
                    details: None,
                }
            }
            AppError::Pricing(e) => {
                if status.is_server_error() {
                    tracing::error!("Pricing error: {}", e);
                } else {
                    tracing::debug!("Pricing request rejected: {}", e);
                }
                PricingErrorResponse {
                    error_type: e.error_type().to_string(),
                    message: e.to_string(),
                    details: e.details(),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
