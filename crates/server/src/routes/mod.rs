//! HTTP route tree.
//!
//! ```text
//! /health                              GET  liveness check
//! /api/auth
//!   /register                          POST create account
//!   /login                             POST issue token
//!   /profile                           GET  PUT  own profile
//! /api/products
//!   /                                  GET  filtered catalog
//!   /categories                        GET  category list
//!   /featured                          GET  featured picks
//!   /seasonal                          GET  seasonal picks
//!   /{id}                              GET  single product
//! /api/cart                            GET  POST  DELETE
//!   /{id}                              PUT  DELETE
//! /api/orders                          GET  POST
//!   /history/summary                   GET  purchase stats
//!   /clear/all                         DELETE finished orders
//!   /{id}                              GET  DELETE
//!   /{id}/cancel                       PUT
//! /api/favorites                       GET  POST
//!   /toggle                            POST
//!   /check/{product_id}                GET
//!   /{product_id}                      DELETE
//! /api/settings                        GET
//!   /themes                            GET
//!   /theme                             GET  PUT (admin)
//!   /marquee                           GET  PUT (admin)
//! /api/admin                           (admin)
//!   /dashboard                         GET
//!   /categories                        GET
//!   /orders                            GET
//!   /orders/{id}                       GET
//!   /orders/{id}/status                PUT
//!   /products                          GET  POST
//!   /products/{id}                     PUT  DELETE
//!   /members                           GET
//!   /members/{id}/credit               PUT
//!   /members/{id}/status               PUT
//!   /members/{id}                      DELETE
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod favorites;
pub mod orders;
pub mod products;
pub mod settings;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth::routes())
        .nest("/api/products", products::routes())
        .nest("/api/cart", cart::routes())
        .nest("/api/orders", orders::routes())
        .nest("/api/favorites", favorites::routes())
        .nest("/api/settings", settings::routes())
        .nest("/api/admin", admin::routes())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
