use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::types::dto::common::ErrorResponse;

/// Error taxonomy surfaced across the API boundary. Each variant carries a
/// machine-readable code and a human-readable message; internals never leak.
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Missing, invalid or expired token, or failed login
    #[oai(status = 401)]
    Unauthenticated(Json<ErrorResponse>),

    /// Authenticated but the role does not permit the action
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Uniqueness violation, or deletion blocked by a business rule
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Referenced entity does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Stock quantity rule violated
    #[oai(status = 400)]
    InvalidMovement(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    Internal(Json<ErrorResponse>),
}

impl ApiError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(Json(ErrorResponse {
            error: "unauthenticated".to_string(),
            message: message.into(),
            status_code: 401,
        }))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(Json(ErrorResponse {
            error: "forbidden".to_string(),
            message: message.into(),
            status_code: 403,
        }))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(Json(ErrorResponse {
            error: "conflict".to_string(),
            message: message.into(),
            status_code: 409,
        }))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(Json(ErrorResponse {
            error: "not_found".to_string(),
            message: message.into(),
            status_code: 404,
        }))
    }

    pub fn invalid_movement(message: impl Into<String>) -> Self {
        ApiError::InvalidMovement(Json(ErrorResponse {
            error: "invalid_movement".to_string(),
            message: message.into(),
            status_code: 400,
        }))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: message.into(),
            status_code: 500,
        }))
    }

    /// Map a database failure to an opaque internal error. The operation name
    /// goes to the log, not to the client.
    pub fn database(operation: &str, source: sea_orm::DbErr) -> Self {
        tracing::error!(operation, error = %source, "database operation failed");
        Self::internal(format!("Database operation '{}' failed", operation))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            ApiError::Unauthenticated(json) => json.0.message.clone(),
            ApiError::Forbidden(json) => json.0.message.clone(),
            ApiError::Conflict(json) => json.0.message.clone(),
            ApiError::NotFound(json) => json.0.message.clone(),
            ApiError::InvalidMovement(json) => json.0.message.clone(),
            ApiError::Internal(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
