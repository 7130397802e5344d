use fruit_porter_core::{OrderId, OrderItemId, ProductId};
use rust_decimal::Decimal;
use serde::Serialize;

/// One line of an order, snapshotted at checkout.
///
/// `product_name` and `unit_price` are copies taken when the order was
/// placed, so the order history survives product renames and deletions.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}
