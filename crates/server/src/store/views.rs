//! Joined row shapes.
//!
//! The storefront mostly reads rows enriched with columns from a
//! related table: products carry their category name, cart lines carry
//! live product data, orders carry customer contact details. Each
//! `project_*` function builds the joined rows from base tables without
//! mutating anything; running a projection twice yields the same rows.
//!
//! Joined columns are `Option` because the related row may have been
//! deleted; a missing product or customer never drops the base row.

use chrono::{DateTime, Utc};
use fruit_porter_core::{CartItemId, Email, FavoriteId, ProductId, UserId};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Order, Product};
use crate::store::Database;

/// A product with its category name.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub category_name: Option<String>,
}

/// A cart line joined with the current state of its product.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub stock: Option<i32>,
}

/// An order with the customer's contact details.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub customer_name: Option<String>,
    pub customer_email: Option<Email>,
    pub customer_phone: Option<String>,
}

/// A favorite joined with the current state of its product.
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteView {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub image_url: Option<String>,
    pub stock: Option<i32>,
    pub category_name: Option<String>,
}

pub fn project_products(db: &Database) -> Vec<ProductView> {
    db.products
        .iter()
        .map(|product| ProductView {
            category_name: product.category_id.and_then(|category_id| {
                db.categories
                    .iter()
                    .find(|c| c.id == category_id)
                    .map(|c| c.name.clone())
            }),
            product: product.clone(),
        })
        .collect()
}

pub fn project_cart_items(db: &Database) -> Vec<CartItemView> {
    db.cart_items
        .iter()
        .map(|line| {
            let product = db.products.iter().find(|p| p.id == line.product_id);
            CartItemView {
                id: line.id,
                user_id: line.user_id,
                product_id: line.product_id,
                quantity: line.quantity,
                created_at: line.created_at,
                name: product.map(|p| p.name.clone()),
                price: product.map(|p| p.price),
                image_url: product.and_then(|p| p.image_url.clone()),
                stock: product.map(|p| p.stock),
            }
        })
        .collect()
}

pub fn project_orders(db: &Database) -> Vec<OrderView> {
    db.orders
        .iter()
        .map(|order| {
            let customer = db.users.iter().find(|u| u.id == order.user_id);
            OrderView {
                order: order.clone(),
                customer_name: customer.map(|u| u.name.clone()),
                customer_email: customer.map(|u| u.email.clone()),
                customer_phone: customer.and_then(|u| u.phone.clone()),
            }
        })
        .collect()
}

pub fn project_favorites(db: &Database) -> Vec<FavoriteView> {
    db.favorites
        .iter()
        .map(|favorite| {
            let product = db.products.iter().find(|p| p.id == favorite.product_id);
            let category_name = product
                .and_then(|p| p.category_id)
                .and_then(|category_id| {
                    db.categories
                        .iter()
                        .find(|c| c.id == category_id)
                        .map(|c| c.name.clone())
                });
            FavoriteView {
                id: favorite.id,
                user_id: favorite.user_id,
                product_id: favorite.product_id,
                created_at: favorite.created_at,
                name: product.map(|p| p.name.clone()),
                price: product.map(|p| p.price),
                original_price: product.and_then(|p| p.original_price),
                image_url: product.and_then(|p| p.image_url.clone()),
                stock: product.map(|p| p.stock),
                category_name,
            }
        })
        .collect()
}
