use chrono::{DateTime, Utc};
use fruit_porter_core::CategoryId;
use serde::Serialize;

/// A product category shown as a storefront filter.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Small glyph shown next to the name in category filters.
    pub icon: Option<String>,
    /// Display position, ascending.
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}
