use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain::DomainError;
use store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            // Contended or stateful rejections the client can retry or resolve
            DomainError::DuplicateUsername
            | DomainError::NumberAlreadyTaken(_)
            | DomainError::InsufficientEligibleNumbers { .. }
            | DomainError::AdminNotConfigured
            | DomainError::RaffleNotActive
            | DomainError::InvalidTransition(_) => ApiError::Conflict(err.to_string()),

            DomainError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            DomainError::AccountBlocked => ApiError::Forbidden(err.to_string()),

            // Everything else is malformed input
            _ => ApiError::Validation(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::OrganizerNotFound
            | StoreError::RaffleNotFound
            | StoreError::PurchaseNotFound => ApiError::NotFound(err.to_string()),
            StoreError::NotOwner => ApiError::Forbidden(err.to_string()),
            StoreError::AdminAlreadyConfigured => ApiError::Conflict(err.to_string()),
            StoreError::Domain(inner) => inner.into(),
        }
    }
}

impl From<shared::password::PasswordError> for ApiError {
    fn from(err: shared::password::PasswordError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<shared::token::TokenError> for ApiError {
    fn from(err: shared::token::TokenError) -> Self {
        tracing::debug!("Token rejected: {}", err);
        ApiError::Unauthorized("Invalid or expired token".into())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(m) => format!("{}: {}", field, m),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        // field_errors is a map; keep the message order deterministic
        messages.sort();

        ApiError::Validation(messages.join("; "))
    }
}
