use crate::api::ErrorResponse;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use diesel::result::Error as DieselError;
use tastecheck_core::{AccessError, TransitionError, UnresolvedReference, ValidationError};
use thiserror::Error;

/// Every failure a handler can return. Server-side variants are logged in
/// full and reported to the client with a generic message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(String),

    #[error("Recipe not found")]
    NotFound,

    #[error("{0}")]
    InvalidTransition(String),

    #[error("Verified recipes can no longer be edited")]
    RecipeLocked,

    #[error("database error: {0}")]
    Persistence(DieselError),

    #[error("recipe write exceeded its time budget")]
    Timeout,

    #[error("database connection failed: {0}")]
    Pool(String),

    #[error(transparent)]
    UnresolvedReference(#[from] UnresolvedReference),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidTransition(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::RecipeLocked => StatusCode::CONFLICT,
            AppError::Persistence(_)
            | AppError::Timeout
            | AppError::Pool(_)
            | AppError::UnresolvedReference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code sent alongside the message.
    pub fn reason(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_failed",
            AppError::Unauthenticated => "unauthenticated",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound => "not_found",
            AppError::InvalidTransition(_) => "invalid_transition",
            AppError::RecipeLocked => "recipe_locked",
            AppError::Persistence(_) => "persistence_failed",
            AppError::Timeout => "write_timed_out",
            AppError::Pool(_) => "database_unavailable",
            AppError::UnresolvedReference(_) => "unresolved_reference",
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Persistence(_) => "Failed to save changes".to_string(),
            AppError::Timeout => "Saving the recipe took too long".to_string(),
            AppError::Pool(_) => "Database connection failed".to_string(),
            AppError::UnresolvedReference(_) => "Failed to save ingredients".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<DieselError> for AppError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => AppError::NotFound,
            DieselError::DatabaseError(_, ref info) if is_timeout_message(info.message()) => {
                AppError::Timeout
            }
            other => AppError::Persistence(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(ValidationError::single(rejection.body_text()))
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotFound => AppError::NotFound,
            AccessError::Forbidden(_) => AppError::Forbidden(err.to_string()),
        }
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::InvalidState { .. } => AppError::InvalidTransition(err.to_string()),
            TransitionError::Access(access) => access.into(),
            TransitionError::Validation(validation) => validation.into(),
        }
    }
}

/// Postgres reports `statement_timeout` and `lock_timeout` only through the
/// message text.
fn is_timeout_message(message: &str) -> bool {
    message.contains("statement timeout") || message.contains("lock timeout")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(reason = self.reason(), error = %self, "request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.client_message(),
                reason: self.reason().to_string(),
            }),
        )
            .into_response()
    }
}
