//! Error handling for the pantry ledger
//!
//! Every failure the engine can report maps to one variant here and renders
//! as a JSON error body with a stable code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::QuantityOverflow;
use thiserror::Error;
use uuid::Uuid;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Concurrency errors
    #[error("On-hand for ingredient {ingredient_id} changed during reconciliation")]
    ConcurrentModification { ingredient_id: Uuid },

    // Store errors
    #[error("Store unreachable: {0}")]
    Connectivity(String),

    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unknown_ingredient(ingredient_id: Uuid) -> Self {
        AppError::validation(
            "ingredient_id",
            format!("Ingredient {} does not exist", ingredient_id),
        )
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ConcurrentModification { .. } => "CONCURRENT_MODIFICATION",
            AppError::Connectivity(_) => "STORE_UNAVAILABLE",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::Migration(_) | AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConcurrentModification { .. } => StatusCode::CONFLICT,
            AppError::Connectivity(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseError(_) | AppError::Migration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to hand back to a client
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation { message, .. } => message.clone(),
            AppError::NotFound(resource) => format!("{} not found", resource),
            AppError::ConcurrentModification { .. } => {
                "Stock changed while the count was being saved. Re-read and retry.".to_string()
            }
            AppError::Connectivity(_) => "The inventory store is unreachable".to_string(),
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
            AppError::Migration(_) | AppError::Internal(_) => {
                "An internal server error occurred".to_string()
            }
        }
    }

    fn field(&self) -> Option<String> {
        match self {
            AppError::Validation { field, .. } => Some(field.clone()),
            AppError::ConcurrentModification { .. } => Some("ingredient_id".to_string()),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => AppError::Connectivity(err.to_string()),
            other => AppError::DatabaseError(other),
        }
    }
}

impl From<QuantityOverflow> for AppError {
    fn from(err: QuantityOverflow) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let (field, message) = errors
            .field_errors()
            .into_iter()
            .next()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (field.to_string(), message)
            })
            .unwrap_or_else(|| ("input".to_string(), errors.to_string()));

        AppError::Validation { field, message }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<&AppError> for ErrorDetail {
    fn from(err: &AppError) -> Self {
        ErrorDetail {
            code: err.code().to_string(),
            message: err.public_message(),
            field: err.field(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        let body = ErrorResponse {
            error: ErrorDetail::from(&self),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
