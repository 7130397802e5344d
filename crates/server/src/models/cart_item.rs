use chrono::{DateTime, Utc};
use fruit_porter_core::{CartItemId, ProductId, UserId};
use serde::Serialize;

/// One line of a user's cart.
///
/// At most one line exists per `(user_id, product_id)` pair; adding the
/// same product again merges into the existing line's quantity.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}
