//! Cart endpoints. All of them require a logged-in account.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use fruit_porter_core::{CartItemId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::{CartRepository, NewCartItem, ProductRepository};
use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::state::AppState;
use crate::store::views::CartItemView;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(add).delete(clear))
        .route("/{id}", put(update_quantity).delete(remove))
}

#[derive(Debug, Serialize)]
struct CartResponse {
    items: Vec<CartItemView>,
    total: Decimal,
}

#[derive(Debug, Deserialize)]
struct AddRequest {
    product_id: i32,
    quantity: i32,
}

#[derive(Debug, Serialize)]
struct LineResponse {
    message: &'static str,
    item: CartItemView,
}

#[derive(Debug, Deserialize)]
struct UpdateQuantityRequest {
    quantity: i32,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ClearResponse {
    message: &'static str,
    removed: usize,
}

fn cart_total(items: &[CartItemView]) -> Decimal {
    items
        .iter()
        .filter_map(|line| line.price.map(|price| price * Decimal::from(line.quantity)))
        .sum()
}

async fn list(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Json<CartResponse> {
    let mut txn = state.store().begin();
    let items = CartRepository::new(&mut txn).lines_for_user(current.id);
    let total = cart_total(&items);
    Json(CartResponse { items, total })
}

async fn add(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(body): Json<AddRequest>,
) -> Result<(StatusCode, Json<LineResponse>), AppError> {
    if body.quantity < 1 {
        return Err(AppError::BadRequest("quantity must be at least 1".into()));
    }
    let product_id = ProductId::new(body.product_id);

    let mut txn = state.store().begin();
    let product = ProductRepository::new(&mut txn)
        .get(product_id)
        .ok_or(AppError::NotFound("product"))?;

    // Adding a product already in the cart merges quantities.
    let existing = CartRepository::new(&mut txn).find_by_user_and_product(current.id, product_id);
    let line_id = match existing {
        Some(line) => {
            let merged = line.quantity + body.quantity;
            if merged > product.stock {
                return Err(AppError::BadRequest("insufficient stock".into()));
            }
            CartRepository::new(&mut txn).set_quantity(line.id, merged);
            line.id
        }
        None => {
            if body.quantity > product.stock {
                return Err(AppError::BadRequest("insufficient stock".into()));
            }
            CartRepository::new(&mut txn).insert(NewCartItem {
                user_id: current.id,
                product_id,
                quantity: body.quantity,
            })
        }
    };
    let item = CartRepository::new(&mut txn)
        .find_line(line_id)
        .ok_or(AppError::NotFound("cart item"))?;
    Ok((
        StatusCode::CREATED,
        Json(LineResponse {
            message: "added to cart",
            item,
        }),
    ))
}

async fn update_quantity(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
    Json(body): Json<UpdateQuantityRequest>,
) -> Result<Json<LineResponse>, AppError> {
    if body.quantity < 1 {
        return Err(AppError::BadRequest("quantity must be at least 1".into()));
    }
    let line_id = CartItemId::new(id);

    let mut txn = state.store().begin();
    let line = CartRepository::new(&mut txn)
        .find_line(line_id)
        .filter(|line| line.user_id == current.id)
        .ok_or(AppError::NotFound("cart item"))?;
    if line.stock.unwrap_or(0) < body.quantity {
        return Err(AppError::BadRequest("insufficient stock".into()));
    }
    CartRepository::new(&mut txn).set_quantity(line_id, body.quantity);
    let item = CartRepository::new(&mut txn)
        .find_line(line_id)
        .ok_or(AppError::NotFound("cart item"))?;
    Ok(Json(LineResponse {
        message: "quantity updated",
        item,
    }))
}

async fn remove(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    let line_id = CartItemId::new(id);
    let mut txn = state.store().begin();
    let owned = CartRepository::new(&mut txn)
        .find_line(line_id)
        .is_some_and(|line| line.user_id == current.id);
    if !owned {
        return Err(AppError::NotFound("cart item"));
    }
    CartRepository::new(&mut txn).delete(line_id);
    Ok(Json(MessageResponse {
        message: "removed from cart",
    }))
}

async fn clear(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Json<ClearResponse> {
    let mut txn = state.store().begin();
    let removed = CartRepository::new(&mut txn).clear_user(current.id);
    Json(ClearResponse {
        message: "cart cleared",
        removed,
    })
}
