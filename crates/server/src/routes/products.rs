//! Public catalog endpoints.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use fruit_porter_core::{CategoryId, ProductId};
use serde::{Deserialize, Serialize};

use crate::db::{CategoryRepository, ProductListFilter, ProductRepository};
use crate::error::AppError;
use crate::models::Category;
use crate::state::AppState;
use crate::store::views::ProductView;

/// How many products the featured and seasonal shelves show.
const SHELF_LIMIT: usize = 8;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/categories", get(list_categories))
        .route("/featured", get(featured))
        .route("/seasonal", get(seasonal))
        .route("/{id}", get(find))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListParams {
    category: Option<i32>,
    featured: Option<bool>,
    seasonal: Option<bool>,
    search: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ListResponse {
    products: Vec<ProductView>,
    total: usize,
}

#[derive(Debug, Serialize)]
struct ShelfResponse {
    products: Vec<ProductView>,
}

#[derive(Debug, Serialize)]
struct ProductResponse {
    product: ProductView,
}

#[derive(Debug, Serialize)]
struct CategoriesResponse {
    categories: Vec<Category>,
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<ListResponse> {
    let mut txn = state.store().begin();
    let (products, total) = ProductRepository::new(&mut txn).list(&ProductListFilter {
        category: params.category.map(CategoryId::new),
        featured: params.featured.unwrap_or(false),
        seasonal: params.seasonal.unwrap_or(false),
        search: params.search,
        limit: params.limit,
        offset: params.offset.unwrap_or(0),
    });
    Json(ListResponse { products, total })
}

async fn featured(State(state): State<AppState>) -> Json<ShelfResponse> {
    let mut txn = state.store().begin();
    let products = ProductRepository::new(&mut txn).featured(SHELF_LIMIT);
    Json(ShelfResponse { products })
}

async fn seasonal(State(state): State<AppState>) -> Json<ShelfResponse> {
    let mut txn = state.store().begin();
    let products = ProductRepository::new(&mut txn).seasonal(SHELF_LIMIT);
    Json(ShelfResponse { products })
}

async fn find(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductResponse>, AppError> {
    let mut txn = state.store().begin();
    let product = ProductRepository::new(&mut txn)
        .find(ProductId::new(id))
        .ok_or(AppError::NotFound("product"))?;
    Ok(Json(ProductResponse { product }))
}

async fn list_categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    let mut txn = state.store().begin();
    let categories = CategoryRepository::new(&mut txn).all();
    Json(CategoriesResponse { categories })
}
