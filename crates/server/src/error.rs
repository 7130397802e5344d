//! Application error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::services::auth::AuthError;
use crate::services::orders::OrderError;
use crate::services::token::TokenError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("login required")]
    Unauthorized,
    #[error("admin access required")]
    Forbidden,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal server error")]
    Internal(#[source] TokenError),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_)
                | AuthError::PasswordTooShort
                | AuthError::EmptyName => StatusCode::BAD_REQUEST,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::AccountSuspended => StatusCode::FORBIDDEN,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Order(err) => match err {
                OrderError::EmptyCart
                | OrderError::MissingShipping
                | OrderError::InsufficientStock(_)
                | OrderError::InsufficientCredit
                | OrderError::ReasonRequired
                | OrderError::NotCancellable
                | OrderError::NotDeletable => StatusCode::BAD_REQUEST,
                OrderError::NotFound | OrderError::UnknownUser => StatusCode::NOT_FOUND,
                OrderError::AccountSuspended => StatusCode::FORBIDDEN,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            sentry::capture_error(&self);
            // Do not leak internals to the client.
            return (status, Json(json!({ "error": "internal server error" })))
                .into_response();
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
