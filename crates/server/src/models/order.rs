use chrono::{DateTime, Utc};
use fruit_porter_core::{OrderId, OrderNumber, OrderStatus, UserId};
use rust_decimal::Decimal;
use serde::Serialize;

/// A placed order.
///
/// Shipping details and the total are frozen at checkout; later product
/// edits never change what an order records.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: OrderNumber,
    pub user_id: UserId,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub shipping_name: String,
    pub shipping_phone: String,
    pub shipping_address: String,
    pub notes: Option<String>,
    /// Why the order was cancelled, set only for cancelled orders.
    pub cancel_reason: Option<String>,
    pub admin_note: Option<String>,
    pub created_at: DateTime<Utc>,
}
