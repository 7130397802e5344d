//! Authentication extractors.
//!
//! Handlers declare their access level by taking [`RequireAuth`] or
//! [`RequireAdmin`] as an argument; the extractor verifies the bearer
//! token and hands over the caller's identity. Missing or invalid
//! tokens reject with 401, a valid token without the admin flag
//! rejects with 403.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::token::CurrentUser;
use crate::state::AppState;

/// Requires a logged-in account.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;
        let user = state
            .tokens()
            .verify_bearer(header)
            .ok_or(AppError::Unauthorized)?;
        Ok(Self(user))
    }
}

/// Requires a logged-in administrator.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(AppError::Forbidden);
        }
        Ok(Self(user))
    }
}
