use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::OrderStatus;

/// Error body returned to API clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Bad Request")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

fn allowed_list(from: &OrderStatus) -> String {
    let allowed = from.allowed_transitions();
    if allowed.is_empty() {
        "none".to_string()
    } else {
        allowed
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::error::DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(
        "Cannot change status from {from} to {to}. Allowed: {}",
        allowed_list(.from)
    )]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Store is currently closed and not accepting new orders")]
    StoreClosed,

    #[error("Order has already been voided")]
    AlreadyVoided,

    #[error("Completed orders cannot be voided")]
    AlreadyCompleted,

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::ValidationError(_)
            | ServiceError::InvalidTransition { .. }
            | ServiceError::StoreClosed
            | ServiceError::AlreadyVoided
            | ServiceError::AlreadyCompleted
            | ServiceError::InvalidOperation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::DatabaseError(_) | ServiceError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal failures are logged with detail; callers get a generic
        // message so storage internals never leak to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "internal server error");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            message,
            timestamp: Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_error_lists_allowed_next_states() {
        let err = ServiceError::InvalidTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Completed,
        };
        let msg = err.to_string();
        assert!(msg.contains("PENDING"), "{msg}");
        assert!(msg.contains("COMPLETED"), "{msg}");
        assert!(msg.contains("PREPARING, CANCELLED"), "{msg}");
    }

    #[test]
    fn terminal_transition_error_says_none() {
        let err = ServiceError::InvalidTransition {
            from: OrderStatus::Completed,
            to: OrderStatus::Pending,
        };
        assert!(err.to_string().contains("Allowed: none"));
    }

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::StoreClosed.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::AlreadyVoided.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::InternalError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
