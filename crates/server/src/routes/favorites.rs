//! Favorites endpoints. All of them require a logged-in account.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use fruit_porter_core::ProductId;
use serde::{Deserialize, Serialize};

use crate::db::{FavoriteRepository, NewFavorite, ProductRepository};
use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::state::AppState;
use crate::store::views::FavoriteView;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(add))
        .route("/toggle", post(toggle))
        .route("/check/{product_id}", get(check))
        .route("/{product_id}", delete(remove))
}

#[derive(Debug, Serialize)]
struct ListResponse {
    favorites: Vec<FavoriteView>,
}

#[derive(Debug, Deserialize)]
struct ProductRequest {
    product_id: i32,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct CheckResponse {
    is_favorite: bool,
}

async fn list(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Json<ListResponse> {
    let mut txn = state.store().begin();
    let favorites = FavoriteRepository::new(&mut txn).list_for_user(current.id);
    Json(ListResponse { favorites })
}

async fn add(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(body): Json<ProductRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let product_id = ProductId::new(body.product_id);
    let mut txn = state.store().begin();
    if ProductRepository::new(&mut txn).get(product_id).is_none() {
        return Err(AppError::NotFound("product"));
    }
    if FavoriteRepository::new(&mut txn)
        .find_pair(current.id, product_id)
        .is_some()
    {
        return Err(AppError::Conflict("already a favorite".into()));
    }
    FavoriteRepository::new(&mut txn).insert(NewFavorite {
        user_id: current.id,
        product_id,
    });
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "added to favorites",
        }),
    ))
}

/// Adds the product if it is not a favorite yet, removes it otherwise.
async fn toggle(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(body): Json<ProductRequest>,
) -> Result<Json<CheckResponse>, AppError> {
    let product_id = ProductId::new(body.product_id);
    let mut txn = state.store().begin();
    if ProductRepository::new(&mut txn).get(product_id).is_none() {
        return Err(AppError::NotFound("product"));
    }
    let mut favorites = FavoriteRepository::new(&mut txn);
    let is_favorite = if favorites.find_pair(current.id, product_id).is_some() {
        favorites.delete_pair(current.id, product_id);
        false
    } else {
        favorites.insert(NewFavorite {
            user_id: current.id,
            product_id,
        });
        true
    };
    Ok(Json(CheckResponse { is_favorite }))
}

async fn check(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(product_id): Path<i32>,
) -> Json<CheckResponse> {
    let mut txn = state.store().begin();
    let is_favorite = FavoriteRepository::new(&mut txn)
        .find_pair(current.id, ProductId::new(product_id))
        .is_some();
    Json(CheckResponse { is_favorite })
}

async fn remove(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(product_id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    let mut txn = state.store().begin();
    let removed =
        FavoriteRepository::new(&mut txn).delete_pair(current.id, ProductId::new(product_id));
    if removed == 0 {
        return Err(AppError::NotFound("favorite"));
    }
    Ok(Json(MessageResponse {
        message: "removed from favorites",
    }))
}
