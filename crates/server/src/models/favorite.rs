use chrono::{DateTime, Utc};
use fruit_porter_core::{FavoriteId, ProductId, UserId};
use serde::Serialize;

/// A product a user marked as a favorite.
///
/// Unique per `(user_id, product_id)` pair.
#[derive(Debug, Clone, Serialize)]
pub struct Favorite {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
}
