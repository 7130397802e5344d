//! Admin console endpoints. Every route requires the admin flag.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use fruit_porter_core::{AccountStatus, CategoryId, OrderId, OrderStatus, ProductId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::{
    CartRepository, CategoryRepository, FavoriteRepository, MemberListFilter, MemberSummary,
    NewProduct, OrderListFilter, OrderRepository, ProductRepository, ProductUpdate, TopProduct,
    UserRepository,
};
use crate::error::AppError;
use crate::middleware::auth::RequireAdmin;
use crate::models::Category;
use crate::routes::orders::{with_items, OrderWithItems};
use crate::services::orders::OrderService;
use crate::state::AppState;
use crate::store::views::{OrderView, ProductView};

const DASHBOARD_RECENT_ORDERS: usize = 10;
const DASHBOARD_TOP_PRODUCTS: usize = 5;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/categories", get(list_categories))
        .route("/orders", get(list_orders))
        .route("/orders/{id}", get(order_detail))
        .route("/orders/{id}/status", put(set_order_status))
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/members", get(list_members))
        .route("/members/{id}/credit", put(set_member_credit))
        .route("/members/{id}/status", put(set_member_status))
        .route("/members/{id}", delete(delete_member))
}

#[derive(Debug, Serialize)]
struct DashboardResponse {
    total_members: usize,
    total_products: usize,
    total_orders: usize,
    pending_orders: usize,
    total_revenue: Decimal,
    recent_orders: Vec<OrderView>,
    top_products: Vec<TopProduct>,
}

async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Json<DashboardResponse> {
    let mut txn = state.store().begin();
    let total_members = UserRepository::new(&mut txn)
        .members(&MemberListFilter::default())
        .1;
    let orders = OrderRepository::new(&mut txn);
    let total_orders = orders.count();
    let pending_orders = orders.count_with_status(OrderStatus::Pending);
    let total_revenue = orders.total_revenue();
    let recent_orders = orders.recent(DASHBOARD_RECENT_ORDERS);
    let products = ProductRepository::new(&mut txn);
    let total_products = products.all().len();
    let top_products = products.top_sellers(DASHBOARD_TOP_PRODUCTS);
    Json(DashboardResponse {
        total_members,
        total_products,
        total_orders,
        pending_orders,
        total_revenue,
        recent_orders,
        top_products,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrderListParams {
    status: Option<String>,
    search: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

#[derive(Debug, Serialize)]
struct OrderListResponse {
    orders: Vec<OrderWithItems>,
    total: usize,
}

async fn list_orders(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<OrderListParams>,
) -> Result<Json<OrderListResponse>, AppError> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    let mut txn = state.store().begin();
    let (views, total) = OrderRepository::new(&mut txn).admin_list(&OrderListFilter {
        status,
        search: params.search,
        limit: params.limit,
        offset: params.offset.unwrap_or(0),
    });
    let orders = views
        .into_iter()
        .map(|view| with_items(&mut txn, view))
        .collect();
    Ok(Json(OrderListResponse { orders, total }))
}

#[derive(Debug, Serialize)]
struct CategoryListResponse {
    categories: Vec<Category>,
}

async fn list_categories(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Json<CategoryListResponse> {
    let mut txn = state.store().begin();
    let categories = CategoryRepository::new(&mut txn).all();
    Json(CategoryListResponse { categories })
}

#[derive(Debug, Serialize)]
struct OrderDetailResponse {
    order: OrderWithItems,
}

async fn order_detail(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<OrderDetailResponse>, AppError> {
    let mut txn = state.store().begin();
    let view = OrderRepository::new(&mut txn)
        .find(OrderId::new(id))
        .ok_or(AppError::NotFound("order"))?;
    let order = with_items(&mut txn, view);
    Ok(Json(OrderDetailResponse { order }))
}

#[derive(Debug, Deserialize)]
struct SetOrderStatusRequest {
    status: String,
    cancel_reason: Option<String>,
    admin_note: Option<String>,
}

#[derive(Debug, Serialize)]
struct OrderResponse {
    message: &'static str,
    order: OrderWithItems,
}

async fn set_order_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(body): Json<SetOrderStatusRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let status = body
        .status
        .parse::<OrderStatus>()
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    let mut txn = state.store().begin();
    let view = OrderService::new(&mut txn).set_status(
        OrderId::new(id),
        status,
        body.cancel_reason,
        body.admin_note,
    )?;
    let order = with_items(&mut txn, view);
    Ok(Json(OrderResponse {
        message: "status updated",
        order,
    }))
}

#[derive(Debug, Serialize)]
struct ProductListResponse {
    products: Vec<ProductView>,
}

async fn list_products(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Json<ProductListResponse> {
    let mut txn = state.store().begin();
    let products = ProductRepository::new(&mut txn).all();
    Json(ProductListResponse { products })
}

#[derive(Debug, Deserialize)]
struct ProductRequest {
    category_id: Option<i32>,
    name: String,
    description: Option<String>,
    price: Decimal,
    original_price: Option<Decimal>,
    image_url: Option<String>,
    stock: i32,
    #[serde(default)]
    is_featured: bool,
    #[serde(default)]
    is_seasonal: bool,
}

#[derive(Debug, Serialize)]
struct ProductResponse {
    message: &'static str,
    product: ProductView,
}

fn validate_product(body: &ProductRequest) -> Result<(), AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    if body.price < Decimal::ZERO {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    if body.stock < 0 {
        return Err(AppError::BadRequest("stock must not be negative".into()));
    }
    Ok(())
}

async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    validate_product(&body)?;
    let mut txn = state.store().begin();
    let id = ProductRepository::new(&mut txn).insert(NewProduct {
        category_id: body.category_id.map(CategoryId::new),
        name: body.name.trim().to_owned(),
        description: body.description,
        price: body.price,
        original_price: body.original_price,
        image_url: body.image_url,
        stock: body.stock,
        is_featured: body.is_featured,
        is_seasonal: body.is_seasonal,
    });
    let product = ProductRepository::new(&mut txn)
        .find(id)
        .ok_or(AppError::NotFound("product"))?;
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            message: "product created",
            product,
        }),
    ))
}

async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(body): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    validate_product(&body)?;
    let product_id = ProductId::new(id);
    let mut txn = state.store().begin();
    let affected = ProductRepository::new(&mut txn).update(
        product_id,
        ProductUpdate {
            category_id: body.category_id.map(CategoryId::new),
            name: body.name.trim().to_owned(),
            description: body.description,
            price: body.price,
            original_price: body.original_price,
            image_url: body.image_url,
            stock: body.stock,
            is_featured: body.is_featured,
            is_seasonal: body.is_seasonal,
        },
    );
    if affected == 0 {
        return Err(AppError::NotFound("product"));
    }
    let product = ProductRepository::new(&mut txn)
        .find(product_id)
        .ok_or(AppError::NotFound("product"))?;
    Ok(Json(ProductResponse {
        message: "product updated",
        product,
    }))
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    let mut txn = state.store().begin();
    if ProductRepository::new(&mut txn).delete(ProductId::new(id)) == 0 {
        return Err(AppError::NotFound("product"));
    }
    Ok(Json(MessageResponse {
        message: "product deleted",
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MemberListParams {
    search: Option<String>,
    status: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

#[derive(Debug, Serialize)]
struct MemberListResponse {
    members: Vec<MemberSummary>,
    total: usize,
}

async fn list_members(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<MemberListParams>,
) -> Result<Json<MemberListResponse>, AppError> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<AccountStatus>)
        .transpose()
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    let mut txn = state.store().begin();
    let (members, total) = UserRepository::new(&mut txn).members(&MemberListFilter {
        search: params.search,
        status,
        limit: params.limit,
        offset: params.offset.unwrap_or(0),
    });
    Ok(Json(MemberListResponse { members, total }))
}

/// Either an absolute balance or a delta, not both.
#[derive(Debug, Deserialize)]
struct SetCreditRequest {
    credit: Option<Decimal>,
    delta: Option<Decimal>,
}

#[derive(Debug, Serialize)]
struct SetCreditResponse {
    message: &'static str,
    credit: Decimal,
}

async fn set_member_credit(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(body): Json<SetCreditRequest>,
) -> Result<Json<SetCreditResponse>, AppError> {
    let user_id = UserId::new(id);
    let mut txn = state.store().begin();
    let mut users = UserRepository::new(&mut txn);
    let user = users.find_by_id(user_id).ok_or(AppError::NotFound("member"))?;

    let new_credit = match (body.credit, body.delta) {
        (Some(credit), None) => credit,
        (None, Some(delta)) => user.credit + delta,
        _ => {
            return Err(AppError::BadRequest(
                "provide either credit or delta".into(),
            ))
        }
    };
    if new_credit < Decimal::ZERO {
        return Err(AppError::BadRequest("credit must not be negative".into()));
    }
    users.set_credit(user_id, new_credit);
    Ok(Json(SetCreditResponse {
        message: "credit updated",
        credit: new_credit,
    }))
}

#[derive(Debug, Deserialize)]
struct SetMemberStatusRequest {
    status: String,
}

async fn set_member_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(body): Json<SetMemberStatusRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let status = body
        .status
        .parse::<AccountStatus>()
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    let mut txn = state.store().begin();
    if UserRepository::new(&mut txn).set_status(UserId::new(id), status) == 0 {
        return Err(AppError::NotFound("member"));
    }
    Ok(Json(MessageResponse {
        message: "status updated",
    }))
}

async fn delete_member(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    let user_id = UserId::new(id);
    let mut txn = state.store().begin();
    let user = UserRepository::new(&mut txn)
        .find_by_id(user_id)
        .ok_or(AppError::NotFound("member"))?;
    if user.is_admin {
        return Err(AppError::BadRequest(
            "admin accounts cannot be deleted".into(),
        ));
    }
    // Cascade: the member's cart and favorites go with the account.
    CartRepository::new(&mut txn).clear_user(user_id);
    for favorite in FavoriteRepository::new(&mut txn).list_for_user(user_id) {
        FavoriteRepository::new(&mut txn).delete_pair(user_id, favorite.product_id);
    }
    UserRepository::new(&mut txn).delete(user_id);
    Ok(Json(MessageResponse {
        message: "member deleted",
    }))
}
