//! Registration, login and profile.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::models::User;
use crate::services::auth::{AuthService, Registration};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile).put(update_profile))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    email: String,
    password: String,
    name: String,
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    message: &'static str,
    token: String,
    user: User,
}

#[derive(Debug, Serialize)]
struct ProfileResponse {
    user: User,
}

#[derive(Debug, Deserialize)]
struct UpdateProfileRequest {
    name: String,
    phone: Option<String>,
    address: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateProfileResponse {
    message: &'static str,
    user: User,
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let mut txn = state.store().begin();
    let user = AuthService::new(&mut txn).register(Registration {
        email: body.email,
        password: body.password,
        name: body.name,
        phone: body.phone,
    })?;
    let token = state.tokens().issue(&user).map_err(AppError::Internal)?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            message: "account created",
            token,
            user,
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let mut txn = state.store().begin();
    let user = AuthService::new(&mut txn).login(&body.email, &body.password)?;
    let token = state.tokens().issue(&user).map_err(AppError::Internal)?;
    Ok(Json(SessionResponse {
        message: "logged in",
        token,
        user,
    }))
}

async fn profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<ProfileResponse>, AppError> {
    let mut txn = state.store().begin();
    let user = AuthService::new(&mut txn).profile(current.id)?;
    Ok(Json(ProfileResponse { user }))
}

async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UpdateProfileResponse>, AppError> {
    let mut txn = state.store().begin();
    let user = AuthService::new(&mut txn).update_profile(
        current.id,
        body.name,
        body.phone,
        body.address,
    )?;
    Ok(Json(UpdateProfileResponse {
        message: "profile updated",
        user,
    }))
}
