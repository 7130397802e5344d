//! Site settings. Reads are public; writes are admin-only.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::db::SettingRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

/// Themes the storefront can switch between.
const THEMES: &[(&str, &str)] = &[
    ("default", "Orchard Green"),
    ("harvest", "Harvest Gold"),
    ("berry", "Berry Purple"),
    ("citrus", "Citrus Bright"),
];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/themes", get(themes))
        .route("/theme", get(get_theme).put(set_theme))
        .route("/marquee", get(get_marquee).put(set_marquee))
}

#[derive(Debug, Serialize)]
struct SettingsResponse {
    settings: BTreeMap<String, String>,
}

/// A single setting read, with the default substituted when unset.
#[derive(Debug, Serialize)]
struct SettingValueResponse {
    value: String,
}

#[derive(Debug, Serialize)]
struct Theme {
    id: &'static str,
    name: &'static str,
}

#[derive(Debug, Serialize)]
struct ThemesResponse {
    themes: Vec<Theme>,
}

#[derive(Debug, Deserialize)]
struct SetThemeRequest {
    theme: String,
}

#[derive(Debug, Serialize)]
struct SetThemeResponse {
    message: &'static str,
    theme: String,
}

#[derive(Debug, Deserialize)]
struct SetMarqueeRequest {
    text: String,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

async fn list(State(state): State<AppState>) -> Json<SettingsResponse> {
    let mut txn = state.store().begin();
    let settings = SettingRepository::new(&mut txn)
        .all()
        .into_iter()
        .map(|setting| (setting.key, setting.value))
        .collect();
    Json(SettingsResponse { settings })
}

async fn get_theme(State(state): State<AppState>) -> Json<SettingValueResponse> {
    let mut txn = state.store().begin();
    let value = SettingRepository::new(&mut txn)
        .get("current_theme")
        .map_or_else(|| "default".to_owned(), |setting| setting.value);
    Json(SettingValueResponse { value })
}

async fn get_marquee(State(state): State<AppState>) -> Json<SettingValueResponse> {
    let mut txn = state.store().begin();
    let value = SettingRepository::new(&mut txn)
        .get("marquee_text")
        .map_or_else(String::new, |setting| setting.value);
    Json(SettingValueResponse { value })
}

async fn themes() -> Json<ThemesResponse> {
    Json(ThemesResponse {
        themes: THEMES
            .iter()
            .map(|&(id, name)| Theme { id, name })
            .collect(),
    })
}

async fn set_theme(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<SetThemeRequest>,
) -> Result<Json<SetThemeResponse>, AppError> {
    if !THEMES.iter().any(|&(id, _)| id == body.theme) {
        return Err(AppError::BadRequest("unknown theme".into()));
    }
    let mut txn = state.store().begin();
    SettingRepository::new(&mut txn).set("current_theme", body.theme.clone());
    Ok(Json(SetThemeResponse {
        message: "theme updated",
        theme: body.theme,
    }))
}

async fn set_marquee(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<SetMarqueeRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let mut txn = state.store().begin();
    SettingRepository::new(&mut txn).set("marquee_text", body.text);
    Ok(Json(MessageResponse {
        message: "marquee updated",
    }))
}
