use chrono::{DateTime, Utc};
use fruit_porter_core::{CategoryId, ProductId};
use rust_decimal::Decimal;
use serde::Serialize;

/// A sellable product.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    /// Pre-discount price, shown struck through when higher than `price`.
    pub original_price: Option<Decimal>,
    pub image_url: Option<String>,
    pub stock: i32,
    pub is_featured: bool,
    pub is_seasonal: bool,
    pub created_at: DateTime<Utc>,
}
