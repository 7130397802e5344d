//! Order endpoints for customers.
//!
//! The static segments (`/history/summary`, `/clear/all`) coexist with
//! `/{id}` because the router prefers static matches over parameters.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use fruit_porter_core::OrderId;
use serde::{Deserialize, Serialize};

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::models::OrderItem;
use crate::services::orders::{Checkout, HistorySummary, OrderError, OrderService};
use crate::state::AppState;
use crate::store::views::OrderView;
use crate::store::Database;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(place))
        .route("/history/summary", get(history_summary))
        .route("/clear/all", delete(clear_finished))
        .route("/{id}", get(find).delete(remove))
        .route("/{id}/cancel", put(cancel))
}

/// An order with its snapshotted lines, as returned to clients.
#[derive(Debug, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub view: OrderView,
    pub items: Vec<OrderItem>,
}

pub fn with_items(db: &mut Database, view: OrderView) -> OrderWithItems {
    let items = OrderRepository::new(db).items(view.order.id);
    OrderWithItems { view, items }
}

#[derive(Debug, Serialize)]
struct ListResponse {
    orders: Vec<OrderWithItems>,
}

#[derive(Debug, Deserialize)]
struct CheckoutRequest {
    shipping_name: String,
    shipping_phone: String,
    shipping_address: String,
    notes: Option<String>,
}

#[derive(Debug, Serialize)]
struct OrderResponse {
    message: &'static str,
    order: OrderWithItems,
}

#[derive(Debug, Serialize)]
struct FindResponse {
    order: OrderWithItems,
}

#[derive(Debug, Deserialize)]
struct CancelRequest {
    reason: String,
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

async fn list(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Json<ListResponse> {
    let mut txn = state.store().begin();
    let views = OrderRepository::new(&mut txn).list_for_user(current.id);
    let orders = views
        .into_iter()
        .map(|view| with_items(&mut txn, view))
        .collect();
    Json(ListResponse { orders })
}

async fn place(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(body): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let mut txn = state.store().begin();
    let view = OrderService::new(&mut txn).place_order(
        current.id,
        &Checkout {
            shipping_name: body.shipping_name,
            shipping_phone: body.shipping_phone,
            shipping_address: body.shipping_address,
            notes: body.notes,
        },
    )?;
    let order = with_items(&mut txn, view);
    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            message: "order placed",
            order,
        }),
    ))
}

async fn history_summary(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Json<HistorySummary> {
    let mut txn = state.store().begin();
    Json(OrderService::new(&mut txn).history_summary(current.id))
}

async fn clear_finished(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Json<ClearResponse> {
    let mut txn = state.store().begin();
    let removed = OrderService::new(&mut txn).clear_finished_orders(current.id);
    Json(ClearResponse {
        message: "finished orders removed",
        removed,
    })
}

async fn find(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<FindResponse>, AppError> {
    let mut txn = state.store().begin();
    let view = OrderRepository::new(&mut txn)
        .find_for_user(OrderId::new(id), current.id)
        .ok_or(AppError::Order(OrderError::NotFound))?;
    let order = with_items(&mut txn, view);
    Ok(Json(FindResponse { order }))
}

async fn cancel(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
    Json(body): Json<CancelRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let mut txn = state.store().begin();
    let view =
        OrderService::new(&mut txn).cancel_order(current.id, OrderId::new(id), &body.reason)?;
    let order = with_items(&mut txn, view);
    Ok(Json(OrderResponse {
        message: "order cancelled",
        order,
    }))
}

async fn remove(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    let mut txn = state.store().begin();
    OrderService::new(&mut txn).delete_order(current.id, OrderId::new(id))?;
    Ok(Json(MessageResponse {
        message: "order removed",
    }))
}
